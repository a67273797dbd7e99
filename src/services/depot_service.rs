use super::api_client::ApiClient;
use super::error::ApiError;
use crate::models::{Depot, DepotPayload};
use crate::utils::endpoints;

/// Depósitos: lectura y actualización (no hay borrado)
#[derive(Clone)]
pub struct DepotService {
    client: ApiClient,
}

impl DepotService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_depots(&self) -> Result<Vec<Depot>, ApiError> {
        self.client.get_list(endpoints::DEPOTS, &[]).await
    }

    pub async fn get_depot(&self, id: &str) -> Result<Depot, ApiError> {
        self.client.get(&endpoints::item(endpoints::DEPOTS, id)).await
    }

    pub async fn update_depot(&self, id: &str, payload: &DepotPayload) -> Result<Depot, ApiError> {
        log::info!("🏭 [DEPOTS] Actualizando depósito {}", id);
        self.client.put(&endpoints::item(endpoints::DEPOTS, id), payload).await
    }
}
