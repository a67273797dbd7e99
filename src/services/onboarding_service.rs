use super::api_client::ApiClient;
use super::error::ApiError;
use crate::models::{AdvanceStepRequest, BasicInfo, OnboardingStatus};
use crate::utils::endpoints;

#[derive(Clone)]
pub struct OnboardingService {
    client: ApiClient,
}

impl OnboardingService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_status(&self) -> Result<OnboardingStatus, ApiError> {
        self.client.get(endpoints::ONBOARDING_STATUS).await
    }

    pub async fn advance_step(&self, step: u8) -> Result<OnboardingStatus, ApiError> {
        log::info!("➡️ [ONBOARDING] Avanzando servidor a paso {}", step);
        self.client
            .post(endpoints::ONBOARDING_ADVANCE, &AdvanceStepRequest { step })
            .await
    }

    /// El backend avanza el paso como efecto de guardar los datos básicos
    pub async fn save_basic_info(&self, info: &BasicInfo) -> Result<OnboardingStatus, ApiError> {
        log::info!("🏢 [ONBOARDING] Guardando datos básicos");
        self.client.post(endpoints::ONBOARDING_BASIC_INFO, info).await
    }
}
