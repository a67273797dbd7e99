use super::api_client::ApiClient;
use super::error::ApiError;
use crate::models::{TeamMember, TeamMemberPayload};
use crate::utils::endpoints;

#[derive(Clone)]
pub struct TeamService {
    client: ApiClient,
}

impl TeamService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_team_members(&self) -> Result<Vec<TeamMember>, ApiError> {
        self.client.get_list(endpoints::TEAM_MEMBERS, &[]).await
    }

    pub async fn create_team_member(&self, payload: &TeamMemberPayload) -> Result<TeamMember, ApiError> {
        log::info!("👤 [TEAM] Creando miembro");
        self.client.post(endpoints::TEAM_MEMBERS, payload).await
    }

    pub async fn update_team_member(&self, id: &str, payload: &TeamMemberPayload) -> Result<TeamMember, ApiError> {
        self.client
            .put(&endpoints::item(endpoints::TEAM_MEMBERS, id), payload)
            .await
    }

    pub async fn delete_team_member(&self, id: &str) -> Result<(), ApiError> {
        log::info!("🗑️ [TEAM] Eliminando miembro {}", id);
        self.client.delete(&endpoints::item(endpoints::TEAM_MEMBERS, id)).await
    }
}
