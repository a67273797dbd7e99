// ============================================================================
// JOBS STORE - Lista de jobs + vista de borradores por fecha
// ============================================================================
// Único escritor de la copia en memoria de los jobs. Los borradores se indexan
// por fecha, por eso crear/actualizar un job que queda en `draft` recarga el
// conjunto de borradores; cualquier otro estado se reconcilia in situ.
// ============================================================================

use std::collections::HashSet;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::models::{Job, JobPayload, JobStatus, OptimizationResult};
use crate::runtime::Runtime;
use crate::services::{ApiError, JobService};
use crate::state::{CollectionState, Generation, Notifications, ReactiveState};
use crate::utils::{find_closest_date_to_today, unique_sorted_dates};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobsState {
    pub jobs: CollectionState<Job>,
    /// Conjunto completo de borradores (todas las fechas)
    pub drafts: CollectionState<Job>,
    pub draft_dates: Vec<NaiveDate>,
    pub selected_date: Option<NaiveDate>,
}

impl JobsState {
    /// Recalcula las fechas; conserva la selección si sigue existiendo
    fn refresh_draft_dates(&mut self, today: NaiveDate) {
        self.draft_dates = unique_sorted_dates(&self.drafts.items);
        let still_present = self
            .selected_date
            .map(|date| self.draft_dates.contains(&date))
            .unwrap_or(false);
        if !still_present {
            self.selected_date = find_closest_date_to_today(&self.draft_dates, today);
        }
    }
}

/// Resultado de un borrado masivo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, String)>,
}

#[derive(Clone)]
pub struct JobsStore {
    service: JobService,
    runtime: Rc<dyn Runtime>,
    notifications: Notifications,
    state: ReactiveState<JobsState>,
    /// Cambia en `reset`; las respuestas de antes no tocan el estado
    generation: Generation,
}

impl JobsStore {
    pub fn new(service: JobService, runtime: Rc<dyn Runtime>, notifications: Notifications) -> Self {
        Self {
            service,
            runtime,
            notifications,
            state: ReactiveState::default(),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> ReactiveState<JobsState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> JobsState {
        self.state.snapshot()
    }

    // ------------------------------------------------------------------
    // Carga
    // ------------------------------------------------------------------

    pub async fn fetch_jobs(&self) {
        let generation = self.generation.current();
        self.state.update(|s| s.jobs.begin_fetch());
        let result = self.service.list_jobs().await;
        if !self.generation.is_current(generation) {
            log::debug!("📋 [JOBS] Respuesta de una sesión anterior descartada");
            return;
        }
        if let Err(e) = &result {
            log::error!("❌ [JOBS] Error cargando jobs: {}", e);
        }
        self.state.update(|s| s.jobs.finish_fetch(result));
    }

    pub async fn initialize_jobs(&self) {
        if !self.state.with(|s| s.jobs.needs_initial_fetch()) {
            log::debug!("📋 [JOBS] Jobs ya cargados o en carga");
            return;
        }
        self.fetch_jobs().await;
    }

    /// Recarga todos los borradores, conservando la fecha elegida si sigue existiendo
    pub async fn fetch_draft_jobs(&self) {
        let generation = self.generation.current();
        self.state.update(|s| s.drafts.begin_fetch());
        let result = self.service.list_jobs_by_status(JobStatus::Draft).await;
        if !self.generation.is_current(generation) {
            log::debug!("📋 [JOBS] Borradores de una sesión anterior descartados");
            return;
        }
        let today = self.runtime.today();
        self.state.update(|s| {
            s.drafts.finish_fetch(result);
            s.refresh_draft_dates(today);
        });
        if let Some(error) = self.state.with(|s| s.drafts.error.clone()) {
            log::error!("❌ [JOBS] Error cargando borradores: {}", error);
        }
    }

    /// Primera carga de borradores: elige la fecha más cercana a hoy
    pub async fn initialize_draft_jobs(&self) {
        if !self.state.with(|s| s.drafts.needs_initial_fetch()) {
            return;
        }
        self.state.update(|s| s.selected_date = None);
        self.fetch_draft_jobs().await;
        log::info!(
            "📅 [JOBS] {} fechas con borradores, seleccionada: {:?}",
            self.state.with(|s| s.draft_dates.len()),
            self.selected_date()
        );
    }

    // ------------------------------------------------------------------
    // Vista por fecha (sin red)
    // ------------------------------------------------------------------

    pub fn set_selected_date(&self, date: Option<NaiveDate>) {
        self.state.update(|s| s.selected_date = date);
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.state.with(|s| s.selected_date)
    }

    pub fn draft_dates(&self) -> Vec<NaiveDate> {
        self.state.with(|s| s.draft_dates.clone())
    }

    pub fn filtered_draft_jobs(&self) -> Vec<Job> {
        self.state.with(|s| match s.selected_date {
            Some(date) => s
                .drafts
                .items
                .iter()
                .filter(|job| job.scheduled_day() == Some(date))
                .cloned()
                .collect(),
            None => Vec::new(),
        })
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    pub async fn create_job(&self, payload: &JobPayload) -> Result<Job, ApiError> {
        validate_payload(payload)?;
        let generation = self.generation.current();
        match self.service.create_job(payload).await {
            Ok(job) => {
                if self.reconcile_saved_job(generation, &job).await {
                    self.notifications.success("Job created");
                }
                Ok(job)
            }
            Err(e) => Err(self.record_failure(generation, "create job", e)),
        }
    }

    pub async fn update_job(&self, id: &str, payload: &JobPayload) -> Result<Job, ApiError> {
        validate_payload(payload)?;
        let generation = self.generation.current();
        match self.service.update_job(id, payload).await {
            Ok(job) => {
                self.reconcile_saved_job(generation, &job).await;
                Ok(job)
            }
            Err(e) => Err(self.record_failure(generation, "update job", e)),
        }
    }

    /// Acción "marcar como completado" del info-window del mapa
    pub async fn mark_completed(&self, id: &str) -> Result<Job, ApiError> {
        let generation = self.generation.current();
        let job = self
            .update_job(id, &JobPayload::status_only(JobStatus::Completed))
            .await?;
        if self.generation.is_current(generation) {
            self.notifications.success("Job marked as completed");
        }
        Ok(job)
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        let generation = self.generation.current();
        match self.service.delete_job(id).await {
            Ok(()) => {
                if self.generation.is_current(generation) {
                    self.remove_locally(&[id.to_string()]);
                    self.notifications.success("Job deleted");
                }
                Ok(())
            }
            Err(e) => Err(self.record_failure(generation, "delete job", e)),
        }
    }

    /// Un DELETE por id; los fallos no detienen el resto
    pub async fn delete_jobs(&self, ids: &[String]) -> BulkDeleteOutcome {
        let generation = self.generation.current();
        let mut outcome = BulkDeleteOutcome::default();
        for id in ids {
            match self.service.delete_job(id).await {
                Ok(()) => outcome.deleted.push(id.clone()),
                Err(e) => outcome.failed.push((id.clone(), e.to_string())),
            }
        }

        if !self.generation.is_current(generation) {
            log::debug!("📋 [JOBS] Borrado masivo terminado tras reset; estado sin tocar");
            return outcome;
        }
        self.remove_locally(&outcome.deleted);

        if outcome.failed.is_empty() {
            self.notifications
                .success(format!("{} jobs deleted", outcome.deleted.len()));
        } else {
            log::warn!("⚠️ [JOBS] {} borrados fallaron", outcome.failed.len());
            self.notifications.warning(format!(
                "{} jobs deleted, {} failed",
                outcome.deleted.len(),
                outcome.failed.len()
            ));
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Parches locales
    // ------------------------------------------------------------------

    /// Parche optimista sobre la copia local (lista general y borradores)
    pub fn patch_job_locally(&self, id: &str, patch: impl Fn(&mut Job)) -> bool {
        let today = self.runtime.today();
        self.state.update(|s| {
            let mut found = false;
            for job in s.jobs.items.iter_mut().chain(s.drafts.items.iter_mut()) {
                if job.id == id {
                    patch(job);
                    found = true;
                }
            }
            // Un parche puede sacar el job de borrador
            if s.drafts.remove_where(|job| !job.is_draft()) {
                s.refresh_draft_dates(today);
            }
            found
        })
    }

    /// Los jobs incluidos en rutas pasan a `assigned`
    pub fn apply_optimization_result(&self, result: &OptimizationResult) {
        let assigned: HashSet<String> = result.assigned_job_ids().into_iter().collect();
        if assigned.is_empty() {
            return;
        }
        let today = self.runtime.today();
        self.state.update(|s| {
            for job in s.jobs.items.iter_mut().filter(|job| assigned.contains(&job.id)) {
                job.status = JobStatus::Assigned;
            }
            s.drafts.remove_where(|job| assigned.contains(&job.id));
            s.refresh_draft_dates(today);
        });
        log::info!("✅ [JOBS] {} jobs asignados por optimización", assigned.len());
    }

    pub fn reset(&self) {
        self.generation.bump();
        self.state.set(JobsState::default());
    }

    /// `false` si la respuesta llegó después de un `reset`
    async fn reconcile_saved_job(&self, generation: u64, job: &Job) -> bool {
        if !self.generation.is_current(generation) {
            log::debug!("📋 [JOBS] Job {} guardado tras reset; estado sin tocar", job.id);
            return false;
        }
        let today = self.runtime.today();
        let is_draft = self.state.update(|s| {
            s.jobs.upsert(job.clone(), |existing| existing.id == job.id);
            if job.is_draft() {
                return true;
            }
            if s.drafts.remove_where(|existing| existing.id == job.id) {
                s.refresh_draft_dates(today);
            }
            false
        });

        if is_draft {
            self.fetch_draft_jobs().await;
        }
        true
    }

    fn remove_locally(&self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        let today = self.runtime.today();
        self.state.update(|s| {
            s.jobs.remove_where(|job| ids.contains(&job.id));
            if s.drafts.remove_where(|job| ids.contains(&job.id)) {
                s.refresh_draft_dates(today);
            }
        });
    }

    fn record_failure(&self, generation: u64, action: &str, error: ApiError) -> ApiError {
        log::error!("❌ [JOBS] No se pudo {}: {}", action, error);
        if self.generation.is_current(generation) {
            let message = error.to_string();
            self.state.update(|s| s.jobs.error = Some(message.clone()));
            self.notifications.error(message);
        }
        error
    }
}

fn validate_payload(payload: &JobPayload) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|errors| ApiError::InvalidRequest(errors.join("; ")))
}
