use crate::models::{TeamMember, TeamMemberPayload};
use crate::services::{ApiError, TeamService};
use crate::state::{CollectionState, Generation, Notifications, ReactiveState};

/// Conductores, administradores y managers del tenant
#[derive(Clone)]
pub struct TeamStore {
    service: TeamService,
    notifications: Notifications,
    state: ReactiveState<CollectionState<TeamMember>>,
    generation: Generation,
}

impl TeamStore {
    pub fn new(service: TeamService, notifications: Notifications) -> Self {
        Self {
            service,
            notifications,
            state: ReactiveState::default(),
            generation: Generation::new(),
        }
    }

    pub fn state(&self) -> ReactiveState<CollectionState<TeamMember>> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> CollectionState<TeamMember> {
        self.state.snapshot()
    }

    pub fn members(&self) -> Vec<TeamMember> {
        self.state.with(|s| s.items.clone())
    }

    pub fn drivers(&self) -> Vec<TeamMember> {
        self.state
            .with(|s| s.items.iter().filter(|m| m.is_driver()).cloned().collect())
    }

    pub async fn fetch_team_members(&self) {
        let generation = self.generation.current();
        self.state.update(|s| s.begin_fetch());
        let result = self.service.list_team_members().await;
        if !self.generation.is_current(generation) {
            log::debug!("👥 [TEAM] Respuesta de una sesión anterior descartada");
            return;
        }
        if let Err(e) = &result {
            log::error!("❌ [TEAM] Error cargando miembros: {}", e);
        }
        self.state.update(|s| s.finish_fetch(result));
    }

    pub async fn initialize_team_members(&self) {
        if self.state.with(|s| s.needs_initial_fetch()) {
            self.fetch_team_members().await;
        }
    }

    pub async fn create_team_member(&self, payload: &TeamMemberPayload) -> Result<TeamMember, ApiError> {
        let generation = self.generation.current();
        match self.service.create_team_member(payload).await {
            Ok(member) => {
                if self.generation.is_current(generation) {
                    self.state.update(|s| s.items.push(member.clone()));
                    self.notifications.success("Team member created");
                }
                Ok(member)
            }
            Err(e) => Err(self.record_failure(generation, e)),
        }
    }

    pub async fn update_team_member(
        &self,
        id: &str,
        payload: &TeamMemberPayload,
    ) -> Result<TeamMember, ApiError> {
        let generation = self.generation.current();
        match self.service.update_team_member(id, payload).await {
            Ok(member) => {
                if self.generation.is_current(generation) {
                    self.state
                        .update(|s| s.upsert(member.clone(), |m| m.id == member.id));
                    self.notifications.success("Team member updated");
                }
                Ok(member)
            }
            Err(e) => Err(self.record_failure(generation, e)),
        }
    }

    pub async fn delete_team_member(&self, id: &str) -> Result<(), ApiError> {
        let generation = self.generation.current();
        match self.service.delete_team_member(id).await {
            Ok(()) => {
                if self.generation.is_current(generation) {
                    self.state.update(|s| s.remove_where(|m| m.id == id));
                    self.notifications.success("Team member deleted");
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
        log::error!("❌ [TEAM] {}", error);
        if self.generation.is_current(generation) {
            self.state.update(|s| s.error = Some(error.to_string()));
            self.notifications.error(error.to_string());
        }
        error
    }
}
