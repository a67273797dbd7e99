use chrono::NaiveDate;

use super::api_client::ApiClient;
use super::error::ApiError;
use super::http::FormPart;
use crate::models::{
    ColumnMapping, GeocodeResponse, ImportRequest, ImportResponse, Job, JobPayload, JobStatus,
    UploadFile, UploadResponse,
};
use crate::utils::{endpoints, format_date};

/// Jobs + pipeline de importación masiva
#[derive(Clone)]
pub struct JobService {
    client: ApiClient,
}

impl JobService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.client.get_list(endpoints::JOBS, &[]).await
    }

    pub async fn list_jobs_by_status(&self, status: JobStatus) -> Result<Vec<Job>, ApiError> {
        self.client
            .get_list(endpoints::JOBS, &[("status", status.as_str().to_string())])
            .await
    }

    pub async fn create_job(&self, payload: &JobPayload) -> Result<Job, ApiError> {
        log::info!("📦 [JOBS] Creando job");
        self.client.post(endpoints::JOBS, payload).await
    }

    pub async fn update_job(&self, id: &str, payload: &JobPayload) -> Result<Job, ApiError> {
        log::info!("📝 [JOBS] Actualizando job {}", id);
        self.client.put(&endpoints::item(endpoints::JOBS, id), payload).await
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        log::info!("🗑️ [JOBS] Eliminando job {}", id);
        self.client.delete(&endpoints::item(endpoints::JOBS, id)).await
    }

    /// Paso 1: subir el archivo para detectar columnas
    pub async fn upload_bulk_file(
        &self,
        file: &UploadFile,
        default_scheduled_date: NaiveDate,
    ) -> Result<UploadResponse, ApiError> {
        log::info!("📤 [BULK] Subiendo {} ({} bytes)", file.file_name, file.size());
        let parts = vec![
            file_part(file),
            FormPart::text("default_scheduled_date", format_date(default_scheduled_date)),
        ];
        self.client.post_multipart(endpoints::JOBS_BULK_UPLOAD, parts).await
    }

    /// Paso 2: reenviar el archivo con el mapping confirmado para geocodificar
    pub async fn geocode_bulk_file(
        &self,
        file: &UploadFile,
        mapping: &ColumnMapping,
        default_scheduled_date: NaiveDate,
    ) -> Result<GeocodeResponse, ApiError> {
        log::info!("🗺️ [BULK] Geocodificando con {} columnas mapeadas", mapping.len());
        let mapping_json =
            serde_json::to_string(mapping).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let parts = vec![
            file_part(file),
            FormPart::text("column_mapping", mapping_json),
            FormPart::text("default_scheduled_date", format_date(default_scheduled_date)),
        ];
        self.client.post_multipart(endpoints::JOBS_BULK_GEOCODE, parts).await
    }

    /// Paso 3: crear los jobs de las filas válidas
    pub async fn import_bulk_rows(&self, request: &ImportRequest) -> Result<ImportResponse, ApiError> {
        log::info!("📥 [BULK] Importando {} filas", request.rows.len());
        self.client.post(endpoints::JOBS_BULK_IMPORT, request).await
    }
}

fn file_part(file: &UploadFile) -> FormPart {
    FormPart::file("file", &file.file_name, &file.mime_type, file.bytes.clone())
}
