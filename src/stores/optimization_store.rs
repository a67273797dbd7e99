// ============================================================================
// OPTIMIZATION STORE - Solicitud de optimización + polling de estado
// ============================================================================
// Un único polling activo. La tarea guarda un `Weak` al store: si el store se
// destruye, el `Drop` aborta la tarea y ningún tick posterior toca el estado.
// Toda cancelación incrementa `generation`; una respuesta (POST o tick) solo
// se aplica si la generación no cambió mientras estaba en vuelo.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::future::{abortable, AbortHandle};
use futures::FutureExt;

use crate::config::OptimizationConfig;
use crate::models::{OptimizationPayload, OptimizationRecord, OptimizationResult};
use crate::runtime::Runtime;
use crate::services::{ApiError, OptimizationService};
use crate::state::{Notifications, ReactiveState};

pub const TIMEOUT_MESSAGE: &str =
    "Optimization is taking longer than expected. Check back in a few minutes.";

/// Cómo terminó el último polling
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed,
    Failed(String),
    /// Límite de intentos alcanzado; no es un fallo
    TimedOut,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizationState {
    pub current: Option<OptimizationRecord>,
    pub is_optimizing: bool,
    pub error: Option<String>,
    pub outcome: Option<PollOutcome>,
}

type CompletionListener = Rc<dyn Fn(&OptimizationResult)>;

struct Inner {
    service: OptimizationService,
    runtime: Rc<dyn Runtime>,
    config: OptimizationConfig,
    notifications: Notifications,
    state: ReactiveState<OptimizationState>,
    poll: RefCell<Option<AbortHandle>>,
    generation: Cell<u64>,
    listeners: RefCell<Vec<CompletionListener>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.poll.get_mut().take() {
            handle.abort();
        }
    }
}

#[derive(Clone)]
pub struct OptimizationStore {
    inner: Rc<Inner>,
}

impl OptimizationStore {
    pub fn new(
        service: OptimizationService,
        runtime: Rc<dyn Runtime>,
        config: OptimizationConfig,
        notifications: Notifications,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                service,
                runtime,
                config,
                notifications,
                state: ReactiveState::default(),
                poll: RefCell::new(None),
                generation: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> ReactiveState<OptimizationState> {
        self.inner.state.clone()
    }

    pub fn snapshot(&self) -> OptimizationState {
        self.inner.state.snapshot()
    }

    pub fn is_polling(&self) -> bool {
        self.inner.poll.borrow().is_some()
    }

    /// Callback al completarse una optimización con resultado
    pub fn on_completed<F>(&self, listener: F)
    where
        F: Fn(&OptimizationResult) + 'static,
    {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Devuelve `ApiError::Cancelled` si se limpió o se inició otra mientras
    /// el POST estaba en vuelo; en ese caso el estado no se toca.
    pub async fn start_optimization(&self, payload: &OptimizationPayload) -> Result<OptimizationRecord, ApiError> {
        self.stop_polling();
        let generation = self.inner.generation.get();
        log::info!(
            "🚀 [OPTIMIZATION] Solicitando optimización: {} jobs, {} conductores",
            payload.job_ids.len(),
            payload.team_member_ids.len()
        );
        self.inner.state.update(|s| {
            s.is_optimizing = true;
            s.error = None;
            s.outcome = None;
        });

        let response = self.inner.service.create_request(payload).await;
        if self.inner.generation.get() != generation {
            log::debug!("🛑 [OPTIMIZATION] Solicitud cancelada antes de la respuesta; descartada");
            return Err(ApiError::Cancelled);
        }

        match response {
            Ok(record) => {
                self.inner.state.update(|s| s.current = Some(record.clone()));
                if record.status.is_terminal() {
                    // El backend puede resolver de forma síncrona
                    finish(&self.inner, &record);
                } else {
                    self.poll_optimization_status(&record.id);
                }
                Ok(record)
            }
            Err(e) => {
                log::error!("❌ [OPTIMIZATION] Error creando solicitud: {}", e);
                self.inner.state.update(|s| {
                    s.is_optimizing = false;
                    s.error = Some(e.to_string());
                });
                self.inner.notifications.error(e.to_string());
                Err(e)
            }
        }
    }

    /// Reemplaza cualquier polling activo por uno nuevo sobre `id`
    pub fn poll_optimization_status(&self, id: &str) {
        self.stop_polling();

        let generation = self.inner.generation.get();
        self.inner.state.update(|s| {
            s.is_optimizing = true;
            s.outcome = None;
        });

        let (task, handle) = abortable(poll_loop(Rc::downgrade(&self.inner), id.to_string(), generation));
        *self.inner.poll.borrow_mut() = Some(handle);
        self.inner.runtime.spawn_local(
            async move {
                if task.await.is_err() {
                    log::debug!("🛑 [OPTIMIZATION] Polling abortado");
                }
            }
            .boxed_local(),
        );
    }

    /// Aborta el polling y también invalida un `start_optimization` en vuelo
    pub fn stop_polling(&self) {
        let handle = self.inner.poll.borrow_mut().take();
        if let Some(handle) = handle {
            handle.abort();
        }
        self.inner.generation.set(self.inner.generation.get() + 1);
        self.inner.state.update(|s| s.is_optimizing = false);
    }

    pub fn clear_optimization(&self) {
        self.stop_polling();
        self.inner.state.set(OptimizationState::default());
    }

    pub fn reset(&self) {
        self.clear_optimization();
    }
}

async fn poll_loop(store: Weak<Inner>, id: String, generation: u64) {
    let Some((service, runtime, interval, max_attempts)) = store.upgrade().map(|inner| {
        (
            inner.service.clone(),
            inner.runtime.clone(),
            Duration::from_millis(inner.config.poll_interval_ms),
            inner.config.max_poll_attempts,
        )
    }) else {
        return;
    };

    for attempt in 1..=max_attempts {
        runtime.sleep(interval).await;
        let response = service.get_request(&id).await;

        let Some(inner) = store.upgrade() else {
            return;
        };
        if inner.generation.get() != generation {
            return;
        }

        match response {
            Ok(record) => {
                log::debug!("⏳ [OPTIMIZATION] Intento {}: {:?}", attempt, record.status);
                inner.state.update(|s| s.current = Some(record.clone()));
                if record.status.is_terminal() {
                    inner.poll.borrow_mut().take();
                    finish(&inner, &record);
                    return;
                }
            }
            Err(e) => {
                log::warn!("⚠️ [OPTIMIZATION] Intento {} falló: {}", attempt, e);
            }
        }
    }

    if let Some(inner) = store.upgrade() {
        if inner.generation.get() == generation {
            log::warn!("⏱️ [OPTIMIZATION] {} intentos sin estado final", max_attempts);
            inner.poll.borrow_mut().take();
            inner.state.update(|s| {
                s.is_optimizing = false;
                s.outcome = Some(PollOutcome::TimedOut);
            });
            inner.notifications.info(TIMEOUT_MESSAGE);
        }
    }
}

fn finish(inner: &Inner, record: &OptimizationRecord) {
    if record.status.is_success() {
        log::info!("✅ [OPTIMIZATION] Optimización {} completada", record.id);
        inner.state.update(|s| {
            s.is_optimizing = false;
            s.outcome = Some(PollOutcome::Completed);
        });
        inner.notifications.success("Routes optimized successfully");

        if let Some(result) = &record.result {
            let listeners: Vec<CompletionListener> = inner.listeners.borrow().clone();
            for listener in listeners {
                listener(result);
            }
        }
    } else {
        let message = record
            .error_message
            .clone()
            .unwrap_or_else(|| "Optimization failed".to_string());
        log::error!("❌ [OPTIMIZATION] Optimización {} falló: {}", record.id, message);
        inner.state.update(|s| {
            s.is_optimizing = false;
            s.error = Some(message.clone());
            s.outcome = Some(PollOutcome::Failed(message.clone()));
        });
        inner.notifications.error(message);
    }
}
