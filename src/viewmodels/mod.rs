// ============================================================================
// VIEWMODELS - Lógica de los asistentes, sin dependencias de la vista
// ============================================================================

pub mod bulk_upload_viewmodel;
pub mod onboarding_viewmodel;

pub use bulk_upload_viewmodel::{BulkUploadError, BulkUploadState, BulkUploadViewModel, WizardStage};
pub use onboarding_viewmodel::{OnboardingError, OnboardingState, OnboardingViewModel};
