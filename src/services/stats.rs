//! Statistics service

use crate::{
    error::AppResult,
    models::team::TeamWorkload,
    repository::{MaintenanceStore, Repository},
};

#[derive(Clone)]
pub struct StatsService<S: MaintenanceStore = Repository> {
    store: S,
}

impl<S: MaintenanceStore> StatsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Requests per maintenance team; equipment without a team counts as "Unassigned"
    pub async fn team_workload(&self) -> AppResult<Vec<TeamWorkload>> {
        self.store.requests_count_by_team().await
    }
}
