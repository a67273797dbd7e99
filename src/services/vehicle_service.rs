use super::api_client::ApiClient;
use super::error::ApiError;
use crate::models::{Vehicle, VehiclePayload};
use crate::utils::endpoints;

#[derive(Clone)]
pub struct VehicleService {
    client: ApiClient,
}

impl VehicleService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.client.get_list(endpoints::VEHICLES, &[]).await
    }

    pub async fn create_vehicle(&self, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        log::info!("🚚 [VEHICLES] Creando vehículo");
        self.client.post(endpoints::VEHICLES, payload).await
    }

    pub async fn update_vehicle(&self, id: &str, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        self.client.put(&endpoints::item(endpoints::VEHICLES, id), payload).await
    }

    pub async fn delete_vehicle(&self, id: &str) -> Result<(), ApiError> {
        log::info!("🗑️ [VEHICLES] Eliminando vehículo {}", id);
        self.client.delete(&endpoints::item(endpoints::VEHICLES, id)).await
    }
}
