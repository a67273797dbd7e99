use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::job::GeoPoint;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationGoal {
    #[default]
    MinimumTime,
    MinimumDistance,
}

/// Estado de una solicitud de optimización en el backend
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Queued,
    Processing,
    Completed,
    /// Alias de `Completed` que devuelven algunas versiones del backend
    Success,
    Failed,
}

impl OptimizationStatus {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Completed | Self::Success)
    }

    pub fn is_terminal(self) -> bool {
        self.is_success() || self == Self::Failed
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct OptimizationPayload {
    pub depot_id: String,
    pub job_ids: Vec<String>,
    pub team_member_ids: Vec<String>,
    pub scheduled_date: NaiveDate,
    pub optimization_goal: OptimizationGoal,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct OptimizationRecord {
    pub id: String,
    pub status: OptimizationStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<OptimizationResult>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub optimization_goal: Option<OptimizationGoal>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct OptimizationResult {
    #[serde(default)]
    pub routes: Vec<VehicleRoute>,
    #[serde(default)]
    pub unassigned_jobs: Vec<UnassignedJob>,
    #[serde(default)]
    pub total_distance_meters: Option<f64>,
    #[serde(default)]
    pub total_duration_seconds: Option<f64>,
}

impl OptimizationResult {
    /// IDs de jobs incluidos en alguna ruta, en orden de aparición
    pub fn assigned_job_ids(&self) -> Vec<String> {
        self.routes
            .iter()
            .flat_map(|route| route.stops.iter())
            .filter_map(|stop| stop.job_id.clone())
            .collect()
    }
}

/// Desglose de la ruta de un vehículo
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct VehicleRoute {
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub team_member_id: Option<String>,
    #[serde(default)]
    pub stops: Vec<RouteStop>,
    /// Polyline codificada
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(default)]
    pub total_distance_meters: Option<f64>,
    #[serde(default)]
    pub total_duration_seconds: Option<f64>,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Depot,
    #[default]
    Job,
    Break,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct RouteStop {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default, rename = "type")]
    pub stop_type: StopType,
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub distance_from_previous_meters: Option<f64>,
    #[serde(default)]
    pub duration_from_previous_seconds: Option<f64>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UnassignedJob {
    pub job_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Ruta persistida (GET optimization/routes)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Route {
    pub id: String,
    #[serde(default)]
    pub optimization_request_id: Option<String>,
    #[serde(default)]
    pub team_member_id: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stops: Vec<RouteStop>,
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(default)]
    pub total_distance_meters: Option<f64>,
    #[serde(default)]
    pub total_duration_seconds: Option<f64>,
}
