//! Equipment service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentSummary, NewEquipment},
        parse_datetime, parse_optional_datetime, required_text,
    },
    repository::{MaintenanceStore, Repository, StoreTransaction},
};

#[derive(Clone)]
pub struct EquipmentService<S: MaintenanceStore = Repository> {
    store: S,
}

impl<S: MaintenanceStore> EquipmentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<EquipmentSummary>> {
        self.store.equipment_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.store
            .equipment_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Register new equipment; it always starts OPERATIONAL
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;

        let new_equipment = NewEquipment {
            name: required_text("name", &data.name)?,
            serial_number: required_text("serialNumber", &data.serial_number)?,
            location: required_text("location", &data.location)?,
            department: data
                .department
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            purchase_date: parse_datetime("purchaseDate", &data.purchase_date)?,
            warranty_end: parse_optional_datetime("warrantyEnd", data.warranty_end.as_deref())?,
            maintenance_team_id: data.maintenance_team_id,
        };

        let mut tx = self.store.begin().await?;
        if let Some(team_id) = new_equipment.maintenance_team_id {
            if tx.team_get(team_id).await?.is_none() {
                return Err(AppError::NotFound(format!("Team {} not found", team_id)));
            }
        }
        let equipment = tx.equipment_insert(&new_equipment).await?;
        tx.commit().await?;

        tracing::info!(
            "Registered equipment {} ({}) with id {}",
            equipment.name,
            equipment.serial_number,
            equipment.id
        );
        Ok(equipment)
    }
}
