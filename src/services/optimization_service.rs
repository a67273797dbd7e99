use chrono::NaiveDate;

use super::api_client::ApiClient;
use super::error::ApiError;
use crate::models::{OptimizationPayload, OptimizationRecord, Route};
use crate::utils::{endpoints, format_date};

/// Solicitudes de optimización: el algoritmo corre en el backend,
/// aquí solo se crea la solicitud y se consulta su estado.
#[derive(Clone)]
pub struct OptimizationService {
    client: ApiClient,
}

impl OptimizationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Start route optimization
    pub async fn create_request(&self, payload: &OptimizationPayload) -> Result<OptimizationRecord, ApiError> {
        log::info!(
            "🎯 [OPTIMIZATION] Enviando {} jobs y {} conductores ({:?})",
            payload.job_ids.len(),
            payload.team_member_ids.len(),
            payload.optimization_goal
        );
        self.client.post(endpoints::OPTIMIZATION_REQUESTS, payload).await
    }

    /// Get optimization status
    pub async fn get_request(&self, id: &str) -> Result<OptimizationRecord, ApiError> {
        log::debug!("🔍 [OPTIMIZATION] Consultando estado: {}", id);
        self.client
            .get(&endpoints::item(endpoints::OPTIMIZATION_REQUESTS, id))
            .await
    }

    pub async fn list_requests(&self) -> Result<Vec<OptimizationRecord>, ApiError> {
        self.client.get_list(endpoints::OPTIMIZATION_REQUESTS, &[]).await
    }

    pub async fn list_routes(&self, date: Option<NaiveDate>) -> Result<Vec<Route>, ApiError> {
        let query: Vec<(&str, String)> = date
            .map(|d| vec![("scheduled_date", format_date(d))])
            .unwrap_or_default();
        self.client.get_list(endpoints::OPTIMIZATION_ROUTES, &query).await
    }
}
