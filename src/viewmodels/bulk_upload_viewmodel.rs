// ============================================================================
// BULK UPLOAD VIEWMODEL - Asistente de importación de jobs
// ============================================================================
// Upload → Mapping → Preview → Completed, solo hacia adelante. Cada acción
// valida su etapa; un fallo de red deja al asistente en la misma etapa.
// `reset()` invalida las respuestas que sigan en vuelo.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    ColumnMapping, FileRejection, ImportRequest, ImportResponse, PreviewRow, PreviewSummary,
    UploadFile, UploadResponse,
};
use crate::services::{ApiError, JobService};
use crate::state::{Generation, Notifications, ReactiveState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStage {
    #[default]
    Upload,
    Mapping,
    Preview,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BulkUploadError {
    #[error("Select a file to upload")]
    NoFile,
    #[error("Select a default scheduled date")]
    MissingDefaultDate,
    #[error(transparent)]
    File(#[from] FileRejection),
    #[error("Map at least one address or location column")]
    MissingAddressMapping,
    #[error("This action is not available in the {0:?} step")]
    WrongStage(WizardStage),
    #[error("There are no rows to import")]
    NothingToImport,
    #[error("The upload was reset")]
    Discarded,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulkUploadState {
    pub stage: WizardStage,
    pub file: Option<UploadFile>,
    pub default_date: Option<NaiveDate>,
    pub upload: Option<UploadResponse>,
    pub mapping: ColumnMapping,
    pub rows: Vec<PreviewRow>,
    pub import_result: Option<ImportResponse>,
    pub is_submitting: bool,
    pub error: Option<String>,
}

type ImportListener = Rc<dyn Fn(&ImportResponse)>;

#[derive(Clone)]
pub struct BulkUploadViewModel {
    service: JobService,
    notifications: Notifications,
    max_file_size_bytes: u64,
    state: ReactiveState<BulkUploadState>,
    session: Generation,
    listeners: Rc<RefCell<Vec<ImportListener>>>,
}

impl BulkUploadViewModel {
    pub fn new(service: JobService, notifications: Notifications, max_file_size_bytes: u64) -> Self {
        Self {
            service,
            notifications,
            max_file_size_bytes,
            state: ReactiveState::default(),
            session: Generation::new(),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn state(&self) -> ReactiveState<BulkUploadState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> BulkUploadState {
        self.state.snapshot()
    }

    pub fn stage(&self) -> WizardStage {
        self.state.with(|s| s.stage)
    }

    /// Se llama tras una importación con al menos un job creado
    pub fn on_imported<F>(&self, listener: F)
    where
        F: Fn(&ImportResponse) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    // ------------------------------------------------------------------
    // Paso 1: archivo + fecha por defecto
    // ------------------------------------------------------------------

    pub fn select_file(&self, file: UploadFile) -> Result<(), BulkUploadError> {
        self.require_stage(WizardStage::Upload)?;
        if let Err(rejection) = file.validate(self.max_file_size_bytes) {
            log::warn!("⚠️ [BULK] Archivo rechazado: {}", rejection);
            self.state.update(|s| {
                s.file = None;
                s.error = Some(rejection.to_string());
            });
            return Err(rejection.into());
        }
        self.state.update(|s| {
            s.file = Some(file);
            s.error = None;
        });
        Ok(())
    }

    pub fn set_default_date(&self, date: NaiveDate) -> Result<(), BulkUploadError> {
        self.require_stage(WizardStage::Upload)?;
        self.state.update(|s| s.default_date = Some(date));
        Ok(())
    }

    pub async fn submit_upload(&self) -> Result<(), BulkUploadError> {
        self.require_stage(WizardStage::Upload)?;
        let (file, date) = self.file_and_date()?;
        file.validate(self.max_file_size_bytes)?;

        let session = self.begin_request();
        let result = self.service.upload_bulk_file(&file, date).await;
        self.ensure_current(session)?;

        match result {
            Ok(response) => {
                log::info!(
                    "📋 [BULK] {} columnas detectadas, {} filas",
                    response.columns.len(),
                    response.total_rows
                );
                let mapping = response.initial_mapping();
                self.state.update(|s| {
                    s.is_submitting = false;
                    s.mapping = mapping;
                    s.upload = Some(response);
                    s.stage = WizardStage::Mapping;
                });
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    // ------------------------------------------------------------------
    // Paso 2: mapping de columnas
    // ------------------------------------------------------------------

    pub fn set_mapping(&self, column: &str, field: Option<String>) -> Result<(), BulkUploadError> {
        self.require_stage(WizardStage::Mapping)?;
        self.state.update(|s| s.mapping.set(column, field));
        Ok(())
    }

    pub fn can_continue(&self) -> bool {
        self.state
            .with(|s| s.stage == WizardStage::Mapping && s.mapping.has_address_field())
    }

    pub async fn submit_mapping(&self) -> Result<(), BulkUploadError> {
        self.require_stage(WizardStage::Mapping)?;
        let mapping = self.state.with(|s| s.mapping.clone());
        if !mapping.has_address_field() {
            return Err(BulkUploadError::MissingAddressMapping);
        }
        let (file, date) = self.file_and_date()?;

        let session = self.begin_request();
        let result = self.service.geocode_bulk_file(&file, &mapping, date).await;
        self.ensure_current(session)?;

        match result {
            Ok(response) => {
                let rows: Vec<PreviewRow> = response.rows.into_iter().map(PreviewRow::from).collect();
                let summary = PreviewSummary::from_rows(&rows);
                log::info!(
                    "🗺️ [BULK] Vista previa: {} ok, {} geocoding, {} validación, {} duplicados",
                    summary.success,
                    summary.geocoding_errors,
                    summary.validation_errors,
                    summary.duplicates
                );
                self.state.update(|s| {
                    s.is_submitting = false;
                    s.rows = rows;
                    s.stage = WizardStage::Preview;
                });
                Ok(())
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    // ------------------------------------------------------------------
    // Paso 3: vista previa + importación
    // ------------------------------------------------------------------

    pub fn preview_rows(&self) -> Vec<PreviewRow> {
        self.state.with(|s| s.rows.clone())
    }

    pub fn summary(&self) -> PreviewSummary {
        self.state.with(|s| PreviewSummary::from_rows(&s.rows))
    }

    pub async fn import(&self) -> Result<ImportResponse, BulkUploadError> {
        self.require_stage(WizardStage::Preview)?;
        let date = self
            .state
            .with(|s| s.default_date)
            .ok_or(BulkUploadError::MissingDefaultDate)?;
        let request = self
            .state
            .with(|s| ImportRequest::from_preview(&s.rows, date));
        if request.rows.is_empty() {
            return Err(BulkUploadError::NothingToImport);
        }

        let session = self.begin_request();
        let result = self.service.import_bulk_rows(&request).await;
        self.ensure_current(session)?;

        match result {
            Ok(response) => {
                self.state.update(|s| {
                    s.is_submitting = false;
                    s.import_result = Some(response.clone());
                    s.stage = WizardStage::Completed;
                });

                if response.failed_count > 0 {
                    log::warn!(
                        "⚠️ [BULK] Importación parcial: {} creados, {} fallidos",
                        response.created_count,
                        response.failed_count
                    );
                    self.notifications.warning(format!(
                        "{} jobs imported, {} failed",
                        response.created_count, response.failed_count
                    ));
                } else {
                    log::info!("✅ [BULK] {} jobs importados", response.created_count);
                    self.notifications
                        .success(format!("{} jobs imported", response.created_count));
                }

                if response.created_count > 0 {
                    let listeners: Vec<ImportListener> = self.listeners.borrow().clone();
                    for listener in listeners {
                        listener(&response);
                    }
                }
                Ok(response)
            }
            Err(e) => Err(self.record_failure(e)),
        }
    }

    /// Vuelve al paso 1 y descarta todo lo transitorio
    pub fn reset(&self) {
        self.session.bump();
        self.state.set(BulkUploadState::default());
    }

    fn require_stage(&self, expected: WizardStage) -> Result<(), BulkUploadError> {
        let stage = self.stage();
        if stage == expected {
            Ok(())
        } else {
            Err(BulkUploadError::WrongStage(stage))
        }
    }

    fn file_and_date(&self) -> Result<(UploadFile, NaiveDate), BulkUploadError> {
        self.state.with(|s| {
            let file = s.file.clone().ok_or(BulkUploadError::NoFile)?;
            let date = s.default_date.ok_or(BulkUploadError::MissingDefaultDate)?;
            Ok((file, date))
        })
    }

    fn begin_request(&self) -> u64 {
        self.state.update(|s| {
            s.is_submitting = true;
            s.error = None;
        });
        self.session.current()
    }

    fn ensure_current(&self, session: u64) -> Result<(), BulkUploadError> {
        if self.session.is_current(session) {
            Ok(())
        } else {
            log::debug!("🗑️ [BULK] Respuesta descartada tras reset");
            Err(BulkUploadError::Discarded)
        }
    }

    fn record_failure(&self, error: ApiError) -> BulkUploadError {
        log::error!("❌ [BULK] {}", error);
        let message = error.to_string();
        self.state.update(|s| {
            s.is_submitting = false;
            s.error = Some(message.clone());
        });
        self.notifications.error(message);
        error.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_stage_reports_current_stage() {
        let error = BulkUploadError::WrongStage(WizardStage::Upload);
        assert_eq!(error.to_string(), "This action is not available in the Upload step");
    }

    #[test]
    fn file_rejection_message_passes_through() {
        let error: BulkUploadError = FileRejection::Empty.into();
        assert_eq!(error.to_string(), "File is empty");
    }
}
