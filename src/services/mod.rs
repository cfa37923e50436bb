//! Business logic services

pub mod equipment;
pub mod lifecycle;
pub mod requests;
pub mod staff;
pub mod stats;

use crate::{
    config::WorkflowConfig,
    error::AppResult,
    repository::{MaintenanceStore, Repository},
};

/// Container for all services, sharing one injected store
#[derive(Clone)]
pub struct Services<S: MaintenanceStore = Repository> {
    store: S,
    pub equipment: equipment::EquipmentService<S>,
    pub requests: requests::RequestsService<S>,
    pub staff: staff::StaffService<S>,
    pub stats: stats::StatsService<S>,
}

impl<S: MaintenanceStore> Services<S> {
    /// Create all services on top of the given store
    pub fn new(store: S, workflow: &WorkflowConfig) -> Self {
        Self {
            equipment: equipment::EquipmentService::new(store.clone()),
            requests: requests::RequestsService::new(store.clone(), workflow.transition_policy),
            staff: staff::StaffService::new(store.clone()),
            stats: stats::StatsService::new(store.clone()),
            store,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
