pub mod error;
pub mod http;
pub mod api_client;
pub mod job_service;
pub mod team_service;
pub mod vehicle_service;
pub mod depot_service;
pub mod optimization_service;
pub mod schedule_service;
pub mod onboarding_service;
#[cfg(target_arch = "wasm32")]
pub mod browser_transport;

pub use error::ApiError;
pub use http::{FormPart, FormValue, HttpRequest, HttpResponse, HttpTransport, Method, RequestBody};
pub use api_client::ApiClient;
pub use job_service::JobService;
pub use team_service::TeamService;
pub use vehicle_service::VehicleService;
pub use depot_service::DepotService;
pub use optimization_service::OptimizationService;
pub use schedule_service::ScheduleService;
pub use onboarding_service::OnboardingService;
#[cfg(target_arch = "wasm32")]
pub use browser_transport::BrowserTransport;
