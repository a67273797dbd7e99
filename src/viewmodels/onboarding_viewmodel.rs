// ============================================================================
// ONBOARDING VIEWMODEL - Paso local del asistente ↔ paso persistido en servidor
// ============================================================================
// Paso local 0 (bienvenida) … 5 (final). Entrar al paso local k (k >= 1)
// equivale al paso de servidor k - 1. El paso 2 avanza guardando los datos
// básicos, nunca con `advance_step`; si el servidor ya los tiene (volver atrás
// desde el paso 3) el avance es solo local.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use crate::models::onboarding::MAX_SERVER_STEP;
use crate::models::{BasicInfo, OnboardingStatus};
use crate::services::{ApiError, OnboardingService};
use crate::state::{Notifications, ReactiveState};

pub const WELCOME_STEP: u8 = 0;
pub const BASIC_INFO_STEP: u8 = 2;
pub const COMPLETION_STEP: u8 = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OnboardingError {
    #[error("A step change is already in progress")]
    Busy,
    #[error("Onboarding is already finished")]
    AlreadyFinished,
    #[error("Save the company details to continue")]
    BasicInfoRequired,
    #[error("Company details can only be saved in step 2 (current step {0})")]
    WrongStep(u8),
    #[error("Company name is required")]
    MissingCompanyName,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnboardingState {
    pub local_step: u8,
    /// Último estado conocido del servidor
    pub server: OnboardingStatus,
    pub is_loaded: bool,
    pub is_advancing: bool,
    pub error: Option<String>,
}

impl OnboardingState {
    pub fn is_finished(&self) -> bool {
        self.local_step >= COMPLETION_STEP
    }
}

/// Paso local desde el que se retoma un onboarding a medias
pub fn resume_step(status: &OnboardingStatus) -> u8 {
    if status.is_completed {
        COMPLETION_STEP
    } else if status.current_step == 0 {
        WELCOME_STEP
    } else {
        (status.current_step.min(MAX_SERVER_STEP) + 1).min(COMPLETION_STEP)
    }
}

#[derive(Clone)]
pub struct OnboardingViewModel {
    service: OnboardingService,
    notifications: Notifications,
    state: ReactiveState<OnboardingState>,
    advancing: Rc<Cell<bool>>,
}

impl OnboardingViewModel {
    pub fn new(service: OnboardingService, notifications: Notifications) -> Self {
        Self {
            service,
            notifications,
            state: ReactiveState::default(),
            advancing: Rc::new(Cell::new(false)),
        }
    }

    pub fn state(&self) -> ReactiveState<OnboardingState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> OnboardingState {
        self.state.snapshot()
    }

    pub fn local_step(&self) -> u8 {
        self.state.with(|s| s.local_step)
    }

    pub async fn initialize(&self) -> Result<(), OnboardingError> {
        match self.service.get_status().await {
            Ok(status) => {
                let step = resume_step(&status);
                log::info!(
                    "🧭 [ONBOARDING] Servidor en paso {}, retomando en paso local {}",
                    status.current_step,
                    step
                );
                self.state.update(|s| {
                    s.server = status;
                    s.local_step = step;
                    s.is_loaded = true;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    /// Avanza desde el paso actual. Solo llama al servidor si va por detrás.
    pub async fn next(&self) -> Result<u8, OnboardingError> {
        let current = self.local_step();
        if current >= COMPLETION_STEP {
            return Err(OnboardingError::AlreadyFinished);
        }
        if current == BASIC_INFO_STEP
            && self.state.with(|s| s.server.current_step) < BASIC_INFO_STEP
        {
            return Err(OnboardingError::BasicInfoRequired);
        }

        let _guard = self.acquire()?;

        if current != WELCOME_STEP && current != BASIC_INFO_STEP {
            // Paso de servidor correspondiente al paso local que se entra
            let target = current;
            let server_step = self.state.with(|s| s.server.current_step);
            if server_step < target {
                match self.service.advance_step(target).await {
                    Ok(status) => self.state.update(|s| s.server = status),
                    Err(e) => return Err(self.record_failure(e)),
                }
            } else {
                log::debug!(
                    "⏭️ [ONBOARDING] Servidor ya en paso {} (>= {}), avance local",
                    server_step,
                    target
                );
            }
        }

        let next = current + 1;
        self.state.update(|s| {
            s.local_step = next;
            s.error = None;
        });
        Ok(next)
    }

    /// Retroceso puramente local
    pub fn back(&self) -> u8 {
        self.state.update(|s| {
            if s.local_step > WELCOME_STEP && !s.is_finished() {
                s.local_step -= 1;
            }
            s.local_step
        })
    }

    /// Paso 2: el backend avanza su contador al guardar
    pub async fn save_basic_info(&self, info: &BasicInfo) -> Result<u8, OnboardingError> {
        let current = self.local_step();
        if current != BASIC_INFO_STEP {
            return Err(OnboardingError::WrongStep(current));
        }
        if info.company_name.trim().is_empty() {
            return Err(OnboardingError::MissingCompanyName);
        }

        let _guard = self.acquire()?;

        match self.service.save_basic_info(info).await {
            Ok(status) => {
                let next = current + 1;
                self.state.update(|s| {
                    s.server = status;
                    s.local_step = next;
                    s.error = None;
                });
                self.notifications.success("Company details saved");
                Ok(next)
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    pub fn reset(&self) {
        self.state.set(OnboardingState::default());
    }

    fn acquire(&self) -> Result<AdvanceGuard, OnboardingError> {
        if self.advancing.replace(true) {
            log::debug!("🔒 [ONBOARDING] Llamada re-entrante ignorada");
            return Err(OnboardingError::Busy);
        }
        self.state.update(|s| s.is_advancing = true);
        Ok(AdvanceGuard {
            flag: self.advancing.clone(),
            state: self.state.clone(),
        })
    }

    fn record_failure(&self, error: ApiError) -> OnboardingError {
        log::error!("❌ [ONBOARDING] {}", error);
        self.state.update(|s| s.error = Some(error.to_string()));
        self.notifications.error(error.to_string());
        error.into()
    }
}

/// Libera el flag de avance en todos los caminos de salida
struct AdvanceGuard {
    flag: Rc<Cell<bool>>,
    state: ReactiveState<OnboardingState>,
}

impl Drop for AdvanceGuard {
    fn drop(&mut self) {
        self.flag.set(false);
        self.state.update(|s| s.is_advancing = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(current_step: u8, is_completed: bool) -> OnboardingStatus {
        OnboardingStatus {
            current_step,
            is_completed,
        }
    }

    #[test]
    fn resume_step_maps_server_to_local() {
        assert_eq!(resume_step(&status(0, false)), WELCOME_STEP);
        assert_eq!(resume_step(&status(1, false)), 2);
        assert_eq!(resume_step(&status(3, false)), 4);
        assert_eq!(resume_step(&status(4, false)), COMPLETION_STEP);
        assert_eq!(resume_step(&status(2, true)), COMPLETION_STEP);
    }
}
