pub mod job;
pub mod team;
pub mod vehicle;
pub mod depot;
pub mod optimization;
pub mod schedule;
pub mod bulk_upload;
pub mod onboarding;

pub use job::{GeoPoint, Job, JobPayload, JobPriority, JobStatus, RecurrenceType};
pub use team::{MemberStatus, NavigationPreferences, RoleType, TeamMember, TeamMemberPayload};
pub use vehicle::{Vehicle, VehiclePayload, VehicleType};
pub use depot::{Depot, DepotPayload};
pub use optimization::{
    OptimizationGoal, OptimizationPayload, OptimizationRecord, OptimizationResult,
    OptimizationStatus, Route, RouteStop, StopType, UnassignedJob, VehicleRoute,
};
pub use schedule::DriverSchedule;
pub use bulk_upload::{
    ColumnInfo, ColumnMapping, FileRejection, GeocodeResponse, GeocodeResult, GeocodedRow,
    ImportRequest, ImportResponse, ImportRow, ImportRowError, PreviewRow, PreviewSummary,
    RowStatus, UploadFile, UploadResponse,
};
pub use onboarding::{AdvanceStepRequest, BasicInfo, OnboardingStatus};
