/// Rutas del backend (relativas a la URL base de la API)
pub mod endpoints {
    pub const JOBS: &str = "/jobs";
    pub const JOBS_BULK_UPLOAD: &str = "/jobs/bulk/upload";
    pub const JOBS_BULK_GEOCODE: &str = "/jobs/bulk/geocode";
    pub const JOBS_BULK_IMPORT: &str = "/jobs/bulk/import";
    pub const TEAM_MEMBERS: &str = "/team-members";
    pub const VEHICLES: &str = "/vehicles";
    pub const DEPOTS: &str = "/depots";
    pub const OPTIMIZATION_REQUESTS: &str = "/optimization/requests";
    pub const OPTIMIZATION_ROUTES: &str = "/optimization/routes";
    pub const SCHEDULE_DRIVERS: &str = "/schedule/drivers";
    pub const ONBOARDING_STATUS: &str = "/onboarding/status";
    pub const ONBOARDING_ADVANCE: &str = "/onboarding/advance";
    pub const ONBOARDING_BASIC_INFO: &str = "/onboarding/basic-info";

    pub fn item(collection: &str, id: &str) -> String {
        format!("{}/{}", collection, id)
    }
}

/// Formato de fecha de los query params y payloads
pub const DATE_FORMAT: &str = "%Y-%m-%d";
