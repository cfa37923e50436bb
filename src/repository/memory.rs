//! In-memory store with the same transactional contract as PostgreSQL.
//!
//! A transaction holds the store lock for its whole lifetime, so readers never
//! observe half-applied changes. Dropping an uncommitted transaction restores
//! the snapshot taken at `begin`.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{MaintenanceStore, StoreTransaction};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{EquipmentStatus, RequestStatus},
        equipment::{Equipment, EquipmentSummary, NewEquipment},
        request::{MaintenanceRequest, NewRequest, RequestChange, RequestDetails, RequestQuery},
        team::{Team, TeamWorkload, UNASSIGNED_TEAM},
        user::{User, UserShort},
    },
};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    teams: BTreeMap<i32, Team>,
    users: BTreeMap<i32, User>,
    equipment: BTreeMap<i32, Equipment>,
    requests: BTreeMap<i32, MaintenanceRequest>,
    last_team_id: i32,
    last_user_id: i32,
    last_equipment_id: i32,
    last_request_id: i32,
}

impl MemoryState {
    fn details(&self, request: &MaintenanceRequest) -> Option<RequestDetails> {
        let equipment = self.equipment.get(&request.equipment_id)?.clone();
        let assigned_to = request
            .assigned_to_id
            .and_then(|id| self.users.get(&id))
            .cloned()
            .map(UserShort::from);
        Some(RequestDetails {
            request: request.clone(),
            equipment,
            assigned_to,
        })
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a maintenance team (reference data)
    pub async fn add_team(&self, name: &str) -> Team {
        let mut state = self.state.lock().await;
        state.last_team_id += 1;
        let team = Team {
            id: state.last_team_id,
            name: name.to_string(),
        };
        state.teams.insert(team.id, team.clone());
        team
    }

    /// Add a technician (reference data)
    pub async fn add_user(&self, name: &str, email: &str, team_id: Option<i32>) -> User {
        let mut state = self.state.lock().await;
        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            name: name.to_string(),
            email: email.to_string(),
            role: "TECHNICIAN".to_string(),
            avatar: None,
            team_id,
        };
        state.users.insert(user.id, user.clone());
        user
    }

    /// Drop an equipment record, leaving its requests dangling.
    /// Only useful to exercise the missing-equipment paths.
    pub async fn remove_equipment(&self, id: i32) -> Option<Equipment> {
        self.state.lock().await.equipment.remove(&id)
    }
}

#[async_trait]
impl MaintenanceStore for InMemoryStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> AppResult<MemoryTransaction> {
        let guard = self.state.clone().lock_owned().await;
        let snapshot = Some(MemoryState::clone(&guard));
        Ok(MemoryTransaction { guard, snapshot })
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn teams_list(&self) -> AppResult<Vec<Team>> {
        let state = self.state.lock().await;
        let mut teams: Vec<Team> = state.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn users_list(&self) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn equipment_list(&self) -> AppResult<Vec<EquipmentSummary>> {
        let state = self.state.lock().await;
        let mut list: Vec<EquipmentSummary> = state
            .equipment
            .values()
            .map(|e| EquipmentSummary {
                equipment: e.clone(),
                maintenance_team: e
                    .maintenance_team_id
                    .and_then(|id| state.teams.get(&id))
                    .cloned(),
                request_count: state
                    .requests
                    .values()
                    .filter(|r| r.equipment_id == e.id)
                    .count() as i64,
            })
            .collect();
        list.sort_by(|a, b| {
            a.equipment
                .name
                .cmp(&b.equipment.name)
                .then(a.equipment.id.cmp(&b.equipment.id))
        });
        Ok(list)
    }

    async fn equipment_get(&self, id: i32) -> AppResult<Option<Equipment>> {
        Ok(self.state.lock().await.equipment.get(&id).cloned())
    }

    async fn requests_list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        let state = self.state.lock().await;
        Ok(state
            .requests
            .values()
            .filter_map(|r| state.details(r))
            .filter(|d| {
                query
                    .team_id
                    .map_or(true, |team| d.equipment.maintenance_team_id == Some(team))
            })
            .filter(|d| query.request_type.map_or(true, |t| d.request.request_type == t))
            .collect())
    }

    async fn requests_get(&self, id: i32) -> AppResult<Option<RequestDetails>> {
        let state = self.state.lock().await;
        Ok(state.requests.get(&id).and_then(|r| state.details(r)))
    }

    async fn requests_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceRequest>> {
        let state = self.state.lock().await;
        let mut history: Vec<MaintenanceRequest> = state
            .requests
            .values()
            .filter(|r| r.equipment_id == equipment_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(history)
    }

    async fn requests_count_by_team(&self) -> AppResult<Vec<TeamWorkload>> {
        let state = self.state.lock().await;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for request in state.requests.values() {
            let Some(equipment) = state.equipment.get(&request.equipment_id) else {
                continue;
            };
            let name = equipment
                .maintenance_team_id
                .and_then(|id| state.teams.get(&id))
                .map(|t| t.name.clone())
                .unwrap_or_else(|| UNASSIGNED_TEAM.to_string());
            *counts.entry(name).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, value)| TeamWorkload { name, value })
            .collect())
    }
}

/// Exclusive access to the in-memory state until commit or drop.
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    snapshot: Option<MemoryState>,
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn team_get(&mut self, id: i32) -> AppResult<Option<Team>> {
        Ok(self.guard.teams.get(&id).cloned())
    }

    async fn user_get(&mut self, id: i32) -> AppResult<Option<User>> {
        Ok(self.guard.users.get(&id).cloned())
    }

    async fn equipment_get(&mut self, id: i32) -> AppResult<Option<Equipment>> {
        Ok(self.guard.equipment.get(&id).cloned())
    }

    async fn equipment_insert(&mut self, data: &NewEquipment) -> AppResult<Equipment> {
        let state = &mut *self.guard;
        if state
            .equipment
            .values()
            .any(|e| e.serial_number == data.serial_number)
        {
            return Err(AppError::Conflict(format!(
                "Equipment with serial number {} already exists",
                data.serial_number
            )));
        }
        state.last_equipment_id += 1;
        let equipment = Equipment {
            id: state.last_equipment_id,
            name: data.name.clone(),
            serial_number: data.serial_number.clone(),
            location: data.location.clone(),
            department: data.department.clone(),
            purchase_date: data.purchase_date,
            warranty_end: data.warranty_end,
            status: EquipmentStatus::Operational,
            maintenance_team_id: data.maintenance_team_id,
            created_at: Utc::now(),
        };
        state.equipment.insert(equipment.id, equipment.clone());
        Ok(equipment)
    }

    async fn equipment_set_status(
        &mut self,
        id: i32,
        status: EquipmentStatus,
    ) -> AppResult<Option<Equipment>> {
        Ok(self.guard.equipment.get_mut(&id).map(|e| {
            e.status = status;
            e.clone()
        }))
    }

    async fn request_get_for_update(&mut self, id: i32) -> AppResult<Option<MaintenanceRequest>> {
        Ok(self.guard.requests.get(&id).cloned())
    }

    async fn request_insert(&mut self, data: &NewRequest) -> AppResult<MaintenanceRequest> {
        let state = &mut *self.guard;
        state.last_request_id += 1;
        let request = MaintenanceRequest {
            id: state.last_request_id,
            title: data.title.clone(),
            description: data.description.clone(),
            request_type: data.request_type,
            priority: data.priority,
            status: RequestStatus::New,
            equipment_id: data.equipment_id,
            assigned_to_id: None,
            scheduled_date: data.scheduled_date,
            duration: None,
            created_at: Utc::now(),
        };
        state.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn request_update(
        &mut self,
        id: i32,
        change: &RequestChange,
    ) -> AppResult<Option<MaintenanceRequest>> {
        Ok(self.guard.requests.get_mut(&id).map(|r| {
            if let Some(status) = change.status {
                r.status = status;
            }
            if let Some(duration) = change.duration {
                r.duration = Some(duration);
            }
            if let Some(user_id) = change.assigned_to_id {
                r.assigned_to_id = Some(user_id);
            }
            r.clone()
        }))
    }

    async fn commit(mut self) -> AppResult<()> {
        self.snapshot = None;
        Ok(())
    }
}
