use serde_json::Value;
use thiserror::Error;

/// Errores de la capa API. `Display` es el mensaje que ve el usuario.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Your session has expired. Please sign in again")]
    Unauthorized,

    #[error("Unexpected response from server: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// La respuesta llegó después de cancelar la operación
    #[error("Request was cancelled")]
    Cancelled,
}

impl ApiError {
    /// Construye el error a partir de una respuesta no-2xx, usando `detail` si el backend lo envía
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        Self::Http { status, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

/// `detail` puede ser texto o la lista de errores de validación `[{ "msg": ... }]`
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
