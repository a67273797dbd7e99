// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// Adjunta el bearer token, traduce status HTTP a ApiError y dispara la cascada
// de cierre de sesión ante un 401. Sin lógica de negocio.
// ============================================================================

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::ApiError;
use super::http::{FormPart, HttpRequest, HttpResponse, HttpTransport, Method, RequestBody};
use crate::state::AuthState;

/// Listas: el backend devuelve un array o un objeto paginado
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "data", alias = "results")]
        items: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
    auth: AuthState,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn HttpTransport>, auth: AuthState) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            auth,
        }
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// `path` relativo a la base ("/jobs/42"); los parámetros de query se codifican
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        let response = self.send(Method::Get, url, RequestBody::Empty).await?;
        parse_body(&response)
    }

    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let envelope: ListEnvelope<T> = self.get_with_query(path, query).await?;
        Ok(envelope.into_vec())
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        let response = self.send(Method::Post, url, json_body(body)?).await?;
        parse_body(&response)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        let response = self.send(Method::Put, url, json_body(body)?).await?;
        parse_body(&response)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path, &[])?;
        self.send(Method::Delete, url, RequestBody::Empty).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        let response = self.send(Method::Post, url, RequestBody::Multipart(parts)).await?;
        parse_body(&response)
    }

    async fn send(&self, method: Method, url: String, body: RequestBody) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            url,
            bearer_token: self.auth.get_token(),
            body,
        };

        let response = self.transport.execute(request).await?;

        if response.status == 401 {
            self.auth.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }
        if !response.is_success() {
            let error = ApiError::from_response(response.status, &response.body);
            log::warn!("⚠️ [API] {} → HTTP {}: {}", method.as_str(), response.status, error);
            return Err(error);
        }
        Ok(response)
    }
}

fn json_body<B: Serialize>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_string(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

/// 204 / body vacío se interpreta como `null` (sirve para `()` y `Option<T>`)
fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let body = response.body.trim();
    let body = if body.is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}
