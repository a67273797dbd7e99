// ============================================================================
// APP - Raíz de composición
// ============================================================================
// Crea servicios, stores y viewmodels sobre un único ApiClient y registra
// los callbacks entre ellos: cierre de sesión por 401, resultado de
// optimización e importación masiva.
// ============================================================================

use std::rc::Rc;

use futures::FutureExt;

use crate::config::AppConfig;
use crate::runtime::Runtime;
use crate::services::{
    ApiClient, DepotService, HttpTransport, JobService, OnboardingService, OptimizationService,
    ScheduleService, TeamService, VehicleService,
};
use crate::state::{AuthState, Notifications};
use crate::stores::{
    DepotStore, JobsStore, OptimizationStore, RouteStore, ScheduleStore, TeamStore, VehicleStore,
};
use crate::viewmodels::{BulkUploadViewModel, OnboardingViewModel};

pub struct App {
    pub config: AppConfig,
    pub auth: AuthState,
    pub notifications: Notifications,
    pub jobs: JobsStore,
    pub team: TeamStore,
    pub vehicles: VehicleStore,
    pub depots: DepotStore,
    pub routes: RouteStore,
    pub schedule: ScheduleStore,
    pub optimization: OptimizationStore,
    bulk_upload: BulkUploadViewModel,
    onboarding: OnboardingViewModel,
}

impl App {
    pub fn new(config: AppConfig, transport: Rc<dyn HttpTransport>, runtime: Rc<dyn Runtime>) -> Self {
        let auth = AuthState::new();
        let notifications = Notifications::new();
        let client = ApiClient::new(config.backend_url(), transport, auth.clone());

        let jobs = JobsStore::new(JobService::new(client.clone()), runtime.clone(), notifications.clone());
        let team = TeamStore::new(TeamService::new(client.clone()), notifications.clone());
        let vehicles = VehicleStore::new(VehicleService::new(client.clone()), notifications.clone());
        let depots = DepotStore::new(DepotService::new(client.clone()), notifications.clone());
        let routes = RouteStore::new(OptimizationService::new(client.clone()));
        let schedule = ScheduleStore::new(ScheduleService::new(client.clone()));
        let optimization = OptimizationStore::new(
            OptimizationService::new(client.clone()),
            runtime.clone(),
            config.optimization.clone(),
            notifications.clone(),
        );
        let bulk_upload = BulkUploadViewModel::new(
            JobService::new(client.clone()),
            notifications.clone(),
            config.upload.max_file_size_bytes,
        );
        let onboarding = OnboardingViewModel::new(OnboardingService::new(client), notifications.clone());

        let app = Self {
            config,
            auth,
            notifications,
            jobs,
            team,
            vehicles,
            depots,
            routes,
            schedule,
            optimization,
            bulk_upload,
            onboarding,
        };
        app.wire_sign_out();
        app.wire_optimization(runtime.clone());
        app.wire_bulk_import(runtime);
        log::info!("🚀 [APP] Dashboard listo contra {}", app.config.backend_url());
        app
    }

    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: AppConfig) -> Self {
        use crate::runtime::BrowserRuntime;
        use crate::services::BrowserTransport;

        let sign_in_path = config.sign_in_path.clone();
        let app = Self::new(config, Rc::new(BrowserTransport::new()), Rc::new(BrowserRuntime));
        app.auth.on_sign_out(move || {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Err(e) = window.location().set_href(&sign_in_path) {
                log::error!("❌ [APP] No se pudo redirigir a {}: {:?}", sign_in_path, e);
            }
        });
        app
    }

    pub fn bulk_upload(&self) -> BulkUploadViewModel {
        self.bulk_upload.clone()
    }

    pub fn onboarding(&self) -> OnboardingViewModel {
        self.onboarding.clone()
    }

    /// Carga inicial del dashboard; cada store aplica su guard de `initialize`
    pub async fn initialize_dashboard(&self) {
        futures::join!(
            self.jobs.initialize_jobs(),
            self.jobs.initialize_draft_jobs(),
            self.team.initialize_team_members(),
            self.vehicles.initialize_vehicles(),
            self.depots.initialize_depots(),
            self.routes.initialize_routes(),
        );
    }

    /// Logout voluntario: sin cascada de 401, mismo vaciado de estado
    pub fn sign_out(&self) {
        self.auth.logout();
        (self.reset_all())();
    }

    /// Un 401 vacía todos los slices y descarta el asistente en curso
    fn wire_sign_out(&self) {
        let reset_all = self.reset_all();
        self.auth.on_sign_out(move || {
            log::info!("🧹 [APP] Limpiando stores tras cierre de sesión");
            reset_all();
        });
    }

    fn reset_all(&self) -> impl Fn() + 'static {
        let jobs = self.jobs.clone();
        let team = self.team.clone();
        let vehicles = self.vehicles.clone();
        let depots = self.depots.clone();
        let routes = self.routes.clone();
        let schedule = self.schedule.clone();
        let optimization = self.optimization.clone();
        let bulk_upload = self.bulk_upload.clone();
        let onboarding = self.onboarding.clone();
        move || {
            jobs.reset();
            team.reset();
            vehicles.reset();
            depots.reset();
            routes.reset();
            schedule.reset();
            optimization.reset();
            bulk_upload.reset();
            onboarding.reset();
        }
    }

    fn wire_optimization(&self, runtime: Rc<dyn Runtime>) {
        let jobs = self.jobs.clone();
        let routes = self.routes.clone();
        self.optimization.on_completed(move |result| {
            jobs.apply_optimization_result(result);
            let routes = routes.clone();
            runtime.spawn_local(async move { routes.refresh().await }.boxed_local());
        });
    }

    fn wire_bulk_import(&self, runtime: Rc<dyn Runtime>) {
        let jobs = self.jobs.clone();
        self.bulk_upload.on_imported(move |_| {
            let jobs = jobs.clone();
            runtime.spawn_local(
                async move {
                    jobs.fetch_jobs().await;
                    jobs.fetch_draft_jobs().await;
                }
                .boxed_local(),
            );
        });
    }
}
