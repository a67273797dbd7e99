// ============================================================================
// BROWSER TRANSPORT - fetch() vía gloo-net (solo wasm32)
// ============================================================================

use futures::future::LocalBoxFuture;
use gloo_net::http::{Request, RequestBuilder};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use super::error::ApiError;
use super::http::{FormPart, FormValue, HttpRequest, HttpResponse, HttpTransport, Method, RequestBody};

#[derive(Clone, Default)]
pub struct BrowserTransport;

impl BrowserTransport {
    pub fn new() -> Self {
        Self
    }
}

impl HttpTransport for BrowserTransport {
    fn execute(&self, request: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, ApiError>> {
        Box::pin(async move {
            let method = request.method;
            let url = request.url.clone();

            let mut builder = builder_for(method, &request.url);
            if let Some(token) = &request.bearer_token {
                builder = builder.header("Authorization", &format!("Bearer {}", token));
            }

            let built = match request.body {
                RequestBody::Empty => builder.build(),
                RequestBody::Json(json) => builder
                    .header("Content-Type", "application/json")
                    .body(json),
                RequestBody::Multipart(parts) => builder.body(build_form_data(&parts)?),
            }
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

            let response = built.send().await.map_err(|e| {
                log::error!("❌ [HTTP] {} {} falló: {}", method.as_str(), url, e);
                ApiError::Network(e.to_string())
            })?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::debug!("🌐 [HTTP] {} {} → {}", method.as_str(), url, status);

            Ok(HttpResponse { status, body })
        })
    }
}

fn builder_for(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Delete => Request::delete(url),
    }
}

fn build_form_data(parts: &[FormPart]) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error)?;
    for part in parts {
        match &part.value {
            FormValue::Text(value) => form.append_with_str(&part.name, value).map_err(js_error)?,
            FormValue::File {
                file_name,
                mime_type,
                bytes,
            } => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let chunks = js_sys::Array::of1(&array);
                let options = BlobPropertyBag::new();
                options.set_type(mime_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &options)
                    .map_err(js_error)?;
                form.append_with_blob_and_filename(&part.name, &blob, file_name)
                    .map_err(js_error)?;
            }
        }
    }
    Ok(form)
}

fn js_error(value: JsValue) -> ApiError {
    ApiError::InvalidRequest(format!("{:?}", value))
}
