//! PostgreSQL transaction scope

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::{equipment, requests, teams, users, StoreTransaction};
use crate::{
    error::AppResult,
    models::{
        enums::EquipmentStatus,
        equipment::{Equipment, NewEquipment},
        request::{MaintenanceRequest, NewRequest, RequestChange},
        team::Team,
        user::User,
    },
};

/// Wraps a `sqlx` transaction; sqlx rolls back on drop unless committed.
pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgTransaction {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn team_get(&mut self, id: i32) -> AppResult<Option<Team>> {
        teams::find_team(&mut *self.tx, id).await
    }

    async fn user_get(&mut self, id: i32) -> AppResult<Option<User>> {
        users::find_user(&mut *self.tx, id).await
    }

    async fn equipment_get(&mut self, id: i32) -> AppResult<Option<Equipment>> {
        equipment::find_equipment(&mut *self.tx, id).await
    }

    async fn equipment_insert(&mut self, data: &NewEquipment) -> AppResult<Equipment> {
        equipment::insert_equipment(&mut *self.tx, data).await
    }

    async fn equipment_set_status(
        &mut self,
        id: i32,
        status: EquipmentStatus,
    ) -> AppResult<Option<Equipment>> {
        equipment::set_equipment_status(&mut *self.tx, id, status).await
    }

    async fn request_get_for_update(&mut self, id: i32) -> AppResult<Option<MaintenanceRequest>> {
        requests::find_request_for_update(&mut *self.tx, id).await
    }

    async fn request_insert(&mut self, data: &NewRequest) -> AppResult<MaintenanceRequest> {
        requests::insert_request(&mut *self.tx, data).await
    }

    async fn request_update(
        &mut self,
        id: i32,
        change: &RequestChange,
    ) -> AppResult<Option<MaintenanceRequest>> {
        requests::update_request(&mut *self.tx, id, change).await
    }

    async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
