use serde::{Deserialize, Serialize};

/// Último paso que el backend registra (0..=4)
pub const MAX_SERVER_STEP: u8 = 4;

/// Estado de onboarding persistido por tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OnboardingStatus {
    pub current_step: u8,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceStepRequest {
    pub step: u8,
}

/// Paso 2: datos básicos de la empresa
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BasicInfo {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleet_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
