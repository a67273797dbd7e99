// ============================================================================
// BULK UPLOAD - Tipos del asistente de importación (upload → mapping → preview)
// ============================================================================
// Las filas solo existen en memoria del asistente; únicamente las importables
// se convierten en payloads de creación de jobs.
// ============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::job::GeoPoint;

pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

/// Campos de job que cuentan como dirección/ubicación en el mapping
pub const ADDRESS_FIELDS: &[&str] = &[
    "address",
    "street",
    "city",
    "postal_code",
    "state",
    "country",
    "latitude",
    "longitude",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("File is empty")]
    Empty,
    #[error("Unsupported file type '{0}'. Upload a CSV, XLS or XLSX file")]
    UnsupportedType(String),
    #[error("File is too large ({size} bytes). Maximum size is {max} bytes")]
    TooLarge { size: u64, max: u64 },
}

/// Archivo elegido por el usuario
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    /// MIME que reporta el navegador (puede venir vacío)
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Tipo y tamaño se validan antes de tocar la red
    pub fn validate(&self, max_size_bytes: u64) -> Result<(), FileRejection> {
        let mime = self.mime_type.trim().to_ascii_lowercase();
        let accepted = if mime.is_empty() {
            self.extension()
                .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(false)
        } else {
            ACCEPTED_MIME_TYPES.contains(&mime.as_str())
        };

        if !accepted {
            let reported = if mime.is_empty() {
                self.file_name.clone()
            } else {
                mime
            };
            return Err(FileRejection::UnsupportedType(reported));
        }
        if self.bytes.is_empty() {
            return Err(FileRejection::Empty);
        }
        if self.size() > max_size_bytes {
            return Err(FileRejection::TooLarge {
                size: self.size(),
                max: max_size_bytes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(default)]
    pub suggested_field: Option<String>,
    #[serde(default)]
    pub sample_values: Vec<String>,
}

/// Respuesta de POST /jobs/bulk/upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub upload_id: Option<String>,
    pub columns: Vec<ColumnInfo>,
    #[serde(default)]
    pub suggested_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub sample_data: Vec<Map<String, Value>>,
    #[serde(default)]
    pub total_rows: usize,
}

impl UploadResponse {
    /// Mapping inicial: sugerencias globales, completadas con las de cada columna
    pub fn initial_mapping(&self) -> ColumnMapping {
        let mut mapping = ColumnMapping::default();
        for column in &self.columns {
            let suggestion = self
                .suggested_mapping
                .get(&column.name)
                .or(column.suggested_field.as_ref());
            if let Some(field) = suggestion {
                mapping.set(&column.name, Some(field.clone()));
            }
        }
        mapping
    }
}

/// Columna del archivo → campo de job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl ColumnMapping {
    /// `None` o campo vacío desmapea la columna
    pub fn set(&mut self, column: &str, field: Option<String>) {
        match field.filter(|f| !f.trim().is_empty()) {
            Some(field) => {
                self.0.insert(column.to_string(), field);
            }
            None => {
                self.0.remove(column);
            }
        }
    }

    pub fn field_for(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn has_address_field(&self) -> bool {
        self.0.values().any(|field| ADDRESS_FIELDS.contains(&field.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeocodeResult {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

impl GeocodeResult {
    /// Coordenadas solo si existen y están en rango
    pub fn point(&self) -> Option<GeoPoint> {
        let point = GeoPoint::new(self.lat?, self.lng?);
        point.is_valid().then_some(point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedRow {
    pub row_index: usize,
    #[serde(default)]
    pub original_data: Map<String, Value>,
    #[serde(default)]
    pub mapped_data: Map<String, Value>,
    #[serde(default)]
    pub geocode: GeocodeResult,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub duplicate_reason: Option<String>,
    #[serde(default)]
    pub validation_errors: Vec<String>,
}

/// Respuesta de POST /jobs/bulk/geocode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub rows: Vec<GeocodedRow>,
    #[serde(default)]
    pub total_rows: usize,
}

/// Clasificación de una fila en la vista previa
#[derive(Debug, Clone, PartialEq)]
pub enum RowStatus {
    Success,
    GeocodingError { reason: String },
    ValidationError { reasons: Vec<String> },
    Duplicate { reason: Option<String> },
}

impl RowStatus {
    /// Precedencia: geocoding > validación > duplicado > éxito.
    /// Un `geocode.error` del servidor cuenta como fallo de geocoding aunque
    /// traiga coordenadas válidas; los avisos (`warning`) no.
    pub fn classify(row: &GeocodedRow) -> Self {
        if row.geocode.error.is_some() || row.geocode.point().is_none() {
            let reason = row
                .geocode
                .error
                .clone()
                .unwrap_or_else(|| "Missing or invalid coordinates".to_string());
            return Self::GeocodingError { reason };
        }
        if !row.validation_errors.is_empty() {
            return Self::ValidationError {
                reasons: row.validation_errors.clone(),
            };
        }
        if row.is_duplicate {
            return Self::Duplicate {
                reason: row.duplicate_reason.clone(),
            };
        }
        Self::Success
    }

    /// Los duplicados se importan igual
    pub fn is_importable(&self) -> bool {
        matches!(self, Self::Success | Self::Duplicate { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub row: GeocodedRow,
    pub status: RowStatus,
}

impl From<GeocodedRow> for PreviewRow {
    fn from(row: GeocodedRow) -> Self {
        let status = RowStatus::classify(&row);
        Self { row, status }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewSummary {
    pub total: usize,
    pub success: usize,
    pub geocoding_errors: usize,
    pub validation_errors: usize,
    pub duplicates: usize,
}

impl PreviewSummary {
    pub fn from_rows(rows: &[PreviewRow]) -> Self {
        rows.iter().fold(
            Self {
                total: rows.len(),
                ..Self::default()
            },
            |mut summary, row| {
                match row.status {
                    RowStatus::Success => summary.success += 1,
                    RowStatus::GeocodingError { .. } => summary.geocoding_errors += 1,
                    RowStatus::ValidationError { .. } => summary.validation_errors += 1,
                    RowStatus::Duplicate { .. } => summary.duplicates += 1,
                }
                summary
            },
        )
    }

    pub fn importable(&self) -> usize {
        self.success + self.duplicates
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub row_index: usize,
    pub data: Map<String, Value>,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body de POST /jobs/bulk/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub default_scheduled_date: NaiveDate,
    pub rows: Vec<ImportRow>,
}

impl ImportRequest {
    /// Solo filas sin error de geocoding ni de validación
    pub fn from_preview(rows: &[PreviewRow], default_scheduled_date: NaiveDate) -> Self {
        let rows = rows
            .iter()
            .filter(|preview| preview.status.is_importable())
            .filter_map(|preview| {
                let point = preview.row.geocode.point()?;
                Some(ImportRow {
                    row_index: preview.row.row_index,
                    data: preview.row.mapped_data.clone(),
                    lat: point.lat,
                    lng: point.lng,
                    address: preview.row.geocode.formatted_address.clone(),
                })
            })
            .collect();

        Self {
            default_scheduled_date,
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRowError {
    #[serde(default)]
    pub row_index: Option<usize>,
    pub message: String,
}

/// Respuesta de POST /jobs/bulk/import (éxito parcial posible)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub created_count: usize,
    #[serde(default)]
    pub failed_count: usize,
    #[serde(default)]
    pub errors: Vec<ImportRowError>,
    #[serde(default)]
    pub created_job_ids: Vec<String>,
}

impl ImportResponse {
    pub fn is_partial(&self) -> bool {
        self.created_count > 0 && self.failed_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u64 = 10 * 1024 * 1024;

    fn row(index: usize, lat: Option<f64>, geo_error: Option<&str>, validation: &[&str], duplicate: bool) -> GeocodedRow {
        GeocodedRow {
            row_index: index,
            original_data: Map::new(),
            mapped_data: Map::new(),
            geocode: GeocodeResult {
                lat,
                lng: lat.map(|_| 2.35),
                formatted_address: lat.map(|_| "1 Rue de Rivoli, Paris".to_string()),
                error: geo_error.map(str::to_string),
                warning: None,
            },
            is_duplicate: duplicate,
            duplicate_reason: None,
            validation_errors: validation.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn geocoding_error_wins_over_validation_error() {
        let r = row(0, None, Some("Address not found"), &["phone invalid"], true);
        assert_eq!(
            RowStatus::classify(&r),
            RowStatus::GeocodingError {
                reason: "Address not found".into()
            }
        );
    }

    #[test]
    fn missing_coordinates_without_message_is_geocoding_error() {
        let r = row(0, None, None, &[], false);
        assert!(matches!(RowStatus::classify(&r), RowStatus::GeocodingError { .. }));

        let out_of_range = row(1, Some(123.0), None, &[], false);
        assert!(matches!(RowStatus::classify(&out_of_range), RowStatus::GeocodingError { .. }));
    }

    #[test]
    fn server_geocode_error_wins_over_valid_coordinates() {
        let r = row(0, Some(48.85), Some("Ambiguous address"), &[], false);
        assert_eq!(
            RowStatus::classify(&r),
            RowStatus::GeocodingError {
                reason: "Ambiguous address".into()
            }
        );

        let mut warned = row(1, Some(48.85), None, &[], false);
        warned.geocode.warning = Some("Matched at street level".into());
        assert_eq!(RowStatus::classify(&warned), RowStatus::Success);
    }

    #[test]
    fn validation_error_wins_over_duplicate() {
        let r = row(0, Some(48.85), None, &["missing customer name"], true);
        assert_eq!(
            RowStatus::classify(&r),
            RowStatus::ValidationError {
                reasons: vec!["missing customer name".into()]
            }
        );
    }

    #[test]
    fn duplicate_and_success_are_importable() {
        let dup = RowStatus::classify(&row(0, Some(48.85), None, &[], true));
        let ok = RowStatus::classify(&row(1, Some(48.85), None, &[], false));
        assert!(matches!(dup, RowStatus::Duplicate { .. }));
        assert_eq!(ok, RowStatus::Success);
        assert!(dup.is_importable() && ok.is_importable());
    }

    #[test]
    fn import_request_only_carries_success_and_duplicate_rows() {
        let rows: Vec<PreviewRow> = vec![
            row(0, Some(48.85), None, &[], false),
            row(1, None, Some("not found"), &[], false),
            row(2, Some(48.85), None, &["bad date"], false),
            row(3, Some(48.85), None, &[], true),
        ]
        .into_iter()
        .map(PreviewRow::from)
        .collect();

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let request = ImportRequest::from_preview(&rows, date);
        let indexes: Vec<usize> = request.rows.iter().map(|r| r.row_index).collect();
        assert_eq!(indexes, vec![0, 3]);

        let summary = PreviewSummary::from_rows(&rows);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.importable(), 2);
        assert_eq!(summary.geocoding_errors, 1);
        assert_eq!(summary.validation_errors, 1);
    }

    #[test]
    fn file_validation_checks_type_then_size() {
        let csv = UploadFile::new("jobs.csv", "text/csv", vec![b'a'; 16]);
        assert!(csv.validate(MAX).is_ok());

        let pdf = UploadFile::new("jobs.pdf", "application/pdf", vec![b'a'; 16]);
        assert_eq!(
            pdf.validate(MAX),
            Err(FileRejection::UnsupportedType("application/pdf".into()))
        );

        let unknown_mime = UploadFile::new("Jobs.XLSX", "", vec![1; 16]);
        assert!(unknown_mime.validate(MAX).is_ok());

        let big = UploadFile::new("jobs.csv", "text/csv", vec![0; 32]);
        assert_eq!(big.validate(16), Err(FileRejection::TooLarge { size: 32, max: 16 }));
    }

    #[test]
    fn mapping_requires_an_address_like_field() {
        let mut mapping = ColumnMapping::default();
        mapping.set("Client", Some("customer_name".into()));
        assert!(!mapping.has_address_field());

        mapping.set("Ville", Some("city".into()));
        assert!(mapping.has_address_field());

        mapping.set("Ville", None);
        assert!(!mapping.has_address_field());
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn initial_mapping_prefers_global_suggestions() {
        let response: UploadResponse = serde_json::from_value(serde_json::json!({
            "columns": [
                { "name": "Adresse", "suggested_field": "street" },
                { "name": "Nom", "suggested_field": "customer_name" },
                { "name": "Notes" }
            ],
            "suggested_mapping": { "Adresse": "address" },
            "total_rows": 3
        }))
        .unwrap();

        let mapping = response.initial_mapping();
        assert_eq!(mapping.field_for("Adresse"), Some("address"));
        assert_eq!(mapping.field_for("Nom"), Some("customer_name"));
        assert_eq!(mapping.field_for("Notes"), None);
    }
}
