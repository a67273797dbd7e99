use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coordenadas geográficas (formato del backend: lat/lng)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Lat en [-90, 90], lng en [-180, 180], ambos finitos
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Draft,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub job_type: Option<String>,
    /// `YYYY-MM-DD` o timestamp ISO completo, según el endpoint
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub time_window_start: Option<String>,
    #[serde(default)]
    pub time_window_end: Option<String>,
    /// Minutos en destino
    #[serde(default)]
    pub service_duration: Option<u32>,
    #[serde(default)]
    pub priority: JobPriority,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurrence_type: RecurrenceType,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Job {
    pub fn is_draft(&self) -> bool {
        self.status == JobStatus::Draft
    }

    /// Día programado (ignora la parte horaria si viene un timestamp)
    pub fn scheduled_day(&self) -> Option<NaiveDate> {
        let raw = self.scheduled_date.as_deref()?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Body de creación/actualización de un job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JobPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<JobPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

pub const MIN_SERVICE_DURATION_MINUTES: u32 = 1;
pub const MAX_SERVICE_DURATION_MINUTES: u32 = 480;

impl JobPayload {
    pub fn status_only(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Validación local del formulario; los errores nunca llegan a la red
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(duration) = self.service_duration {
            if !(MIN_SERVICE_DURATION_MINUTES..=MAX_SERVICE_DURATION_MINUTES).contains(&duration) {
                errors.push(format!(
                    "Service duration must be between {} and {} minutes",
                    MIN_SERVICE_DURATION_MINUTES, MAX_SERVICE_DURATION_MINUTES
                ));
            }
        }

        if let (Some(start), Some(end)) = (&self.time_window_start, &self.time_window_end) {
            match (parse_clock(start), parse_clock(end)) {
                (Some(s), Some(e)) if s >= e => {
                    errors.push("Time window start must be before its end".to_string())
                }
                (None, _) | (_, None) => errors.push("Time window must use HH:MM".to_string()),
                _ => {}
            }
        }

        if let Some(location) = &self.location {
            if !location.is_valid() {
                errors.push("Location is outside valid latitude/longitude ranges".to_string());
            }
        }

        if let Some(email) = &self.customer_email {
            if !email.is_empty() && !email.contains('@') {
                errors.push("Customer email is invalid".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse_clock(value: &str) -> Option<chrono::NaiveTime> {
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| chrono::NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}
