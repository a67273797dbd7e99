use serde::{Deserialize, Serialize};

use super::optimization::RouteStop;

/// Agenda de un conductor para una fecha (GET schedule/drivers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSchedule {
    pub team_member_id: String,
    #[serde(default)]
    pub team_member_name: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub work_start_time: Option<String>,
    #[serde(default)]
    pub work_end_time: Option<String>,
    #[serde(default)]
    pub stops: Vec<RouteStop>,
    #[serde(default)]
    pub total_distance_meters: Option<f64>,
    #[serde(default)]
    pub total_duration_seconds: Option<f64>,
}

impl DriverSchedule {
    pub fn has_route(&self) -> bool {
        self.route_id.is_some() || !self.stops.is_empty()
    }
}
