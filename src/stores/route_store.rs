use chrono::NaiveDate;

use crate::models::Route;
use crate::services::OptimizationService;
use crate::state::{CollectionState, Generation, ReactiveState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutesState {
    pub routes: CollectionState<Route>,
    /// Fecha del último fetch (`None` = todas)
    pub date: Option<NaiveDate>,
}

/// Rutas ya optimizadas y persistidas
#[derive(Clone)]
pub struct RouteStore {
    service: OptimizationService,
    state: ReactiveState<RoutesState>,
    generation: Generation,
}

impl RouteStore {
    pub fn new(service: OptimizationService) -> Self {
        Self {
            service,
            state: ReactiveState::default(),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> ReactiveState<RoutesState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> RoutesState {
        self.state.snapshot()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.state.with(|s| s.routes.items.clone())
    }

    pub fn routes_for_member(&self, team_member_id: &str) -> Vec<Route> {
        self.state.with(|s| {
            s.routes
                .items
                .iter()
                .filter(|r| r.team_member_id.as_deref() == Some(team_member_id))
                .cloned()
                .collect()
        })
    }

    pub async fn fetch_routes(&self, date: Option<NaiveDate>) {
        let generation = self.generation.current();
        self.state.update(|s| {
            s.routes.begin_fetch();
            s.date = date;
        });
        let result = self.service.list_routes(date).await;
        if !self.generation.is_current(generation) {
            log::debug!("🗺️ [ROUTES] Respuesta de una sesión anterior descartada");
            return;
        }
        if let Err(e) = &result {
            log::error!("❌ [ROUTES] Error cargando rutas: {}", e);
        }
        self.state.update(|s| s.routes.finish_fetch(result));
    }

    pub async fn initialize_routes(&self) {
        if self.state.with(|s| s.routes.needs_initial_fetch()) {
            self.fetch_routes(None).await;
        }
    }

    /// Refetch con el mismo filtro de fecha
    pub async fn refresh(&self) {
        let date = self.state.with(|s| s.date);
        self.fetch_routes(date).await;
    }

    pub fn reset(&self) {
        self.generation.bump();
        self.state.set(RoutesState::default());
    }
}
