//! Repository layer for database operations
//!
//! Services depend on [`MaintenanceStore`], never on a concrete backend.
//! Every mutation goes through a [`StoreTransaction`] obtained from
//! [`MaintenanceStore::begin`]: changes become visible only on `commit`, and
//! dropping the transaction on any other path rolls them back.

pub mod equipment;
pub mod memory;
pub mod requests;
pub mod teams;
pub mod transaction;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        enums::EquipmentStatus,
        equipment::{Equipment, EquipmentSummary, NewEquipment},
        request::{MaintenanceRequest, NewRequest, RequestChange, RequestDetails, RequestQuery},
        team::{Team, TeamWorkload},
        user::User,
    },
};

pub use memory::InMemoryStore;
pub use transaction::PgTransaction;

/// Read access to the maintenance data plus the entry point for writes.
#[async_trait]
pub trait MaintenanceStore: Clone + Send + Sync + 'static {
    type Tx: StoreTransaction;

    /// Open a transaction scope.
    async fn begin(&self) -> AppResult<Self::Tx>;

    /// Check that the backend is reachable
    async fn ping(&self) -> AppResult<()>;

    async fn teams_list(&self) -> AppResult<Vec<Team>>;

    async fn users_list(&self) -> AppResult<Vec<User>>;

    /// All equipment with team and request count, ordered by name
    async fn equipment_list(&self) -> AppResult<Vec<EquipmentSummary>>;

    async fn equipment_get(&self, id: i32) -> AppResult<Option<Equipment>>;

    /// Requests with equipment and assignee, ordered by id
    async fn requests_list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>>;

    async fn requests_get(&self, id: i32) -> AppResult<Option<RequestDetails>>;

    /// Requests for one equipment, newest first
    async fn requests_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceRequest>>;

    /// Request counts grouped by the team owning the equipment
    async fn requests_count_by_team(&self) -> AppResult<Vec<TeamWorkload>>;
}

/// A unit of work over the store.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn team_get(&mut self, id: i32) -> AppResult<Option<Team>>;

    async fn user_get(&mut self, id: i32) -> AppResult<Option<User>>;

    async fn equipment_get(&mut self, id: i32) -> AppResult<Option<Equipment>>;

    async fn equipment_insert(&mut self, data: &NewEquipment) -> AppResult<Equipment>;

    /// Set the operability status only. Returns `None` if the equipment does not exist.
    async fn equipment_set_status(
        &mut self,
        id: i32,
        status: EquipmentStatus,
    ) -> AppResult<Option<Equipment>>;

    /// Load a request, locking it against concurrent lifecycle changes
    async fn request_get_for_update(&mut self, id: i32) -> AppResult<Option<MaintenanceRequest>>;

    async fn request_insert(&mut self, data: &NewRequest) -> AppResult<MaintenanceRequest>;

    /// Returns `None` if the request does not exist.
    async fn request_update(
        &mut self,
        id: i32,
        change: &RequestChange,
    ) -> AppResult<Option<MaintenanceRequest>>;

    async fn commit(self) -> AppResult<()>;
}

/// PostgreSQL-backed store holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceStore for Repository {
    type Tx = PgTransaction;

    async fn begin(&self) -> AppResult<PgTransaction> {
        Ok(PgTransaction::new(self.pool.begin().await?))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn teams_list(&self) -> AppResult<Vec<Team>> {
        self.teams_list().await
    }

    async fn users_list(&self) -> AppResult<Vec<User>> {
        self.users_list().await
    }

    async fn equipment_list(&self) -> AppResult<Vec<EquipmentSummary>> {
        self.equipment_list().await
    }

    async fn equipment_get(&self, id: i32) -> AppResult<Option<Equipment>> {
        equipment::find_equipment(&self.pool, id).await
    }

    async fn requests_list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        self.requests_list(query).await
    }

    async fn requests_get(&self, id: i32) -> AppResult<Option<RequestDetails>> {
        self.requests_get(id).await
    }

    async fn requests_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceRequest>> {
        self.requests_for_equipment(equipment_id).await
    }

    async fn requests_count_by_team(&self) -> AppResult<Vec<TeamWorkload>> {
        self.requests_count_by_team().await
    }
}
