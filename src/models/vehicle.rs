use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Car,
    #[default]
    Van,
    Truck,
    Motorcycle,
    Bicycle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub license_plate: String,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vehicle_type: VehicleType,
    /// kg
    #[serde(default)]
    pub capacity_weight: Option<f64>,
    /// m³
    #[serde(default)]
    pub capacity_volume: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Vehicle {
    /// Nombre para mostrar: nombre, o marca + modelo, o matrícula
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match (&self.make, &self.model) {
            (Some(make), Some(model)) => format!("{} {} ({})", make, model, self.license_plate),
            _ => self.license_plate.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VehiclePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
