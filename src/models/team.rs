use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    #[default]
    Driver,
    Admin,
    Manager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Online,
    Offline,
}

/// Preferencias de navegación del conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NavigationPreferences {
    #[serde(default)]
    pub avoid_tolls: bool,
    #[serde(default)]
    pub avoid_highways: bool,
    #[serde(default)]
    pub avoid_ferries: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role_type: RoleType,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub work_start_time: Option<String>,
    #[serde(default)]
    pub work_end_time: Option<String>,
    #[serde(default)]
    pub break_start_time: Option<String>,
    #[serde(default)]
    pub break_end_time: Option<String>,
    #[serde(default)]
    pub navigation_preferences: NavigationPreferences,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub cost_per_hour: Option<f64>,
    #[serde(default)]
    pub cost_per_km: Option<f64>,
    #[serde(default)]
    pub fixed_cost: Option<f64>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
}

impl TeamMember {
    pub fn is_driver(&self) -> bool {
        self.role_type == RoleType::Driver
    }
}

/// Body del formulario multi-sección de miembros
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TeamMemberPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<RoleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_preferences: Option<NavigationPreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_hour: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
}
