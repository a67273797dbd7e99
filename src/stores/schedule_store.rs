use chrono::NaiveDate;

use crate::models::DriverSchedule;
use crate::services::ScheduleService;
use crate::state::{Generation, ReactiveState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleState {
    pub date: Option<NaiveDate>,
    pub schedules: Vec<DriverSchedule>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Agenda de conductores por fecha (vista timeline).
/// Solo se aplica la respuesta de la petición más reciente.
#[derive(Clone)]
pub struct ScheduleStore {
    service: ScheduleService,
    state: ReactiveState<ScheduleState>,
    generation: Generation,
}

impl ScheduleStore {
    pub fn new(service: ScheduleService) -> Self {
        Self {
            service,
            state: ReactiveState::default(),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> ReactiveState<ScheduleState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> ScheduleState {
        self.state.snapshot()
    }

    pub async fn fetch_driver_schedules(&self, date: NaiveDate) {
        let generation = self.generation.bump();
        self.state.update(|s| {
            s.date = Some(date);
            s.is_loading = true;
            s.error = None;
        });

        let result = self.service.driver_schedules(date).await;

        if !self.generation.is_current(generation) {
            log::debug!("🗓️ [SCHEDULE] Respuesta obsoleta para {} descartada", date);
            return;
        }

        self.state.update(|s| {
            s.is_loading = false;
            match result {
                Ok(schedules) => s.schedules = schedules,
                Err(e) => {
                    log::error!("❌ [SCHEDULE] Error cargando agenda: {}", e);
                    s.error = Some(e.to_string());
                }
            }
        });
    }

    /// Las respuestas en vuelo se ignorarán al llegar
    pub fn cancel_pending(&self) {
        self.generation.bump();
        self.state.update(|s| s.is_loading = false);
    }

    pub fn reset(&self) {
        self.generation.bump();
        self.state.set(ScheduleState::default());
    }
}
