use serde::{Deserialize, Serialize};

const DEFAULT_BACKEND_URL_DEVELOPMENT: &str = "http://localhost:8000/api/v1";
const DEFAULT_BACKEND_URL_PRODUCTION: &str = "https://api.fleetdashboard.app/api/v1";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;
const DEFAULT_MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_SIGN_IN_PATH: &str = "/auth/signin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub optimization: OptimizationConfig,
    pub upload: UploadConfig,
    pub sign_in_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: DEFAULT_BACKEND_URL_DEVELOPMENT.to_string(),
            backend_url_production: DEFAULT_BACKEND_URL_PRODUCTION.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            optimization: OptimizationConfig::default(),
            upload: UploadConfig::default(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }
}

/// Parámetros del polling de optimización
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .unwrap_or(DEFAULT_BACKEND_URL_DEVELOPMENT)
                .to_string(),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .unwrap_or(DEFAULT_BACKEND_URL_PRODUCTION)
                .to_string(),
            environment: option_env!("ENVIRONMENT").unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true")
                .parse()
                .unwrap_or(true),
            optimization: OptimizationConfig {
                poll_interval_ms: option_env!("OPTIMIZATION_POLL_INTERVAL_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
                max_poll_attempts: option_env!("OPTIMIZATION_MAX_POLL_ATTEMPTS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_POLL_ATTEMPTS),
            },
            upload: UploadConfig {
                max_file_size_bytes: option_env!("MAX_UPLOAD_SIZE_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_BYTES),
            },
            sign_in_path: option_env!("SIGN_IN_PATH")
                .unwrap_or(DEFAULT_SIGN_IN_PATH)
                .to_string(),
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_url_follows_environment() {
        let mut config = AppConfig::default();
        assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL_DEVELOPMENT);

        config.environment = "production".to_string();
        assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL_PRODUCTION);
    }

    #[test]
    fn polling_defaults_cap_at_two_minutes() {
        let config = OptimizationConfig::default();
        assert_eq!(config.poll_interval_ms * config.max_poll_attempts as u64, 120_000);
    }
}
