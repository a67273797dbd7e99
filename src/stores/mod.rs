// ============================================================================
// STORES - Un store por recurso, único escritor de su slice de estado
// ============================================================================

pub mod depot_store;
pub mod jobs_store;
pub mod optimization_store;
pub mod route_store;
pub mod schedule_store;
pub mod team_store;
pub mod vehicle_store;

pub use depot_store::DepotStore;
pub use jobs_store::{BulkDeleteOutcome, JobsState, JobsStore};
pub use optimization_store::{OptimizationState, OptimizationStore, PollOutcome, TIMEOUT_MESSAGE};
pub use route_store::{RouteStore, RoutesState};
pub use schedule_store::{ScheduleState, ScheduleStore};
pub use team_store::TeamStore;
pub use vehicle_store::VehicleStore;
