use crate::models::{Vehicle, VehiclePayload};
use crate::services::{ApiError, VehicleService};
use crate::state::{CollectionState, Generation, Notifications, ReactiveState};

#[derive(Clone)]
pub struct VehicleStore {
    service: VehicleService,
    notifications: Notifications,
    state: ReactiveState<CollectionState<Vehicle>>,
    generation: Generation,
}

impl VehicleStore {
    pub fn new(service: VehicleService, notifications: Notifications) -> Self {
        Self {
            service,
            notifications,
            state: ReactiveState::default(),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> ReactiveState<CollectionState<Vehicle>> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> CollectionState<Vehicle> {
        self.state.snapshot()
    }

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.state.with(|s| s.items.clone())
    }

    pub async fn fetch_vehicles(&self) {
        let generation = self.generation.current();
        self.state.update(|s| s.begin_fetch());
        let result = self.service.list_vehicles().await;
        if !self.generation.is_current(generation) {
            log::debug!("🚚 [VEHICLES] Respuesta de una sesión anterior descartada");
            return;
        }
        if let Err(e) = &result {
            log::error!("❌ [VEHICLES] Error cargando vehículos: {}", e);
        }
        self.state.update(|s| s.finish_fetch(result));
    }

    pub async fn initialize_vehicles(&self) {
        if self.state.with(|s| s.needs_initial_fetch()) {
            self.fetch_vehicles().await;
        }
    }

    pub async fn create_vehicle(&self, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        let generation = self.generation.current();
        match self.service.create_vehicle(payload).await {
            Ok(vehicle) => {
                if self.generation.is_current(generation) {
                    self.state.update(|s| s.items.push(vehicle.clone()));
                    self.notifications.success("Vehicle created");
                }
                Ok(vehicle)
            }
            Err(e) => Err(self.record_failure(generation, e)),
        }
    }

    pub async fn update_vehicle(&self, id: &str, payload: &VehiclePayload) -> Result<Vehicle, ApiError> {
        let generation = self.generation.current();
        match self.service.update_vehicle(id, payload).await {
            Ok(vehicle) => {
                if self.generation.is_current(generation) {
                    self.state
                        .update(|s| s.upsert(vehicle.clone(), |v| v.id == vehicle.id));
                }
                Ok(vehicle)
            }
            Err(e) => Err(self.record_failure(generation, e)),
        }
    }

    pub async fn delete_vehicle(&self, id: &str) -> Result<(), ApiError> {
        let generation = self.generation.current();
        match self.service.delete_vehicle(id).await {
            Ok(()) => {
                if self.generation.is_current(generation) {
                    self.state.update(|s| s.remove_where(|v| v.id == id));
                    self.notifications.success("Vehicle deleted");
                }
                Ok(())
            }
            Err(e) => Err(self.record_failure(generation, e)),
        }
    }

    pub fn reset(&self) {
        self.generation.bump();
        self.state.set(CollectionState::default());
    }

    fn record_failure(&self, generation: u64, error: ApiError) -> ApiError {
        log::error!("❌ [VEHICLES] {}", error);
        if self.generation.is_current(generation) {
            self.state.update(|s| s.error = Some(error.to_string()));
            self.notifications.error(error.to_string());
        }
        error
    }
}
