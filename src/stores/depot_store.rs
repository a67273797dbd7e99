use crate::models::{Depot, DepotPayload};
use crate::services::{ApiError, DepotService};
use crate::state::{CollectionState, Generation, Notifications, ReactiveState};

/// En la práctica hay un único depósito por tenant
#[derive(Clone)]
pub struct DepotStore {
    service: DepotService,
    notifications: Notifications,
    state: ReactiveState<CollectionState<Depot>>,
    generation: Generation,
}

impl DepotStore {
    pub fn new(service: DepotService, notifications: Notifications) -> Self {
        Self {
            service,
            notifications,
            state: ReactiveState::default(),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> ReactiveState<CollectionState<Depot>> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> CollectionState<Depot> {
        self.state.snapshot()
    }

    /// El primero de la lista (`depots[0]`)
    pub fn primary_depot(&self) -> Option<Depot> {
        self.state.with(|s| s.items.first().cloned())
    }

    pub async fn fetch_depots(&self) {
        let generation = self.generation.current();
        self.state.update(|s| s.begin_fetch());
        let result = self.service.list_depots().await;
        if !self.generation.is_current(generation) {
            log::debug!("🏭 [DEPOTS] Respuesta de una sesión anterior descartada");
            return;
        }
        if let Err(e) = &result {
            log::error!("❌ [DEPOTS] Error cargando depósitos: {}", e);
        }
        self.state.update(|s| s.finish_fetch(result));
    }

    pub async fn initialize_depots(&self) {
        if self.state.with(|s| s.needs_initial_fetch()) {
            self.fetch_depots().await;
        }
    }

    pub async fn update_depot(&self, id: &str, payload: &DepotPayload) -> Result<Depot, ApiError> {
        let generation = self.generation.current();
        let result = self.service.update_depot(id, payload).await;
        if !self.generation.is_current(generation) {
            return result;
        }
        match result {
            Ok(depot) => {
                self.state.update(|s| s.upsert(depot.clone(), |d| d.id == depot.id));
                self.notifications.success("Depot updated");
                Ok(depot)
            }
            Err(e) => {
                log::error!("❌ [DEPOTS] {}", e);
                self.state.update(|s| s.error = Some(e.to_string()));
                self.notifications.error(e.to_string());
                Err(e)
            }
        }
    }

    pub fn reset(&self) {
        self.generation.bump();
        self.state.set(CollectionState::default());
    }
}
