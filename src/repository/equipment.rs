//! Equipment domain methods on Repository

use sqlx::{postgres::PgRow, FromRow, PgExecutor, Row};

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{Equipment, EquipmentSummary, NewEquipment},
        team::Team,
    },
};

impl Repository {
    /// List all equipment with its maintenance team and request count
    pub async fn equipment_list(&self) -> AppResult<Vec<EquipmentSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT e.*, t.name AS team_name,
                   (SELECT COUNT(*) FROM maintenance_requests r WHERE r.equipment_id = e.id)::bigint
                       AS request_count
            FROM equipment e
            LEFT JOIN teams t ON t.id = e.maintenance_team_id
            ORDER BY e.name, e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }
}

fn summary_from_row(row: &PgRow) -> AppResult<EquipmentSummary> {
    let equipment = Equipment::from_row(row)?;
    let team_name: Option<String> = row.try_get("team_name")?;
    let maintenance_team = equipment
        .maintenance_team_id
        .zip(team_name)
        .map(|(id, name)| Team { id, name });

    Ok(EquipmentSummary {
        equipment,
        maintenance_team,
        request_count: row.try_get("request_count")?,
    })
}

/// Get equipment by ID
pub(super) async fn find_equipment<'e, E>(executor: E, id: i32) -> AppResult<Option<Equipment>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Insert equipment with status OPERATIONAL
pub(super) async fn insert_equipment<'e, E>(executor: E, data: &NewEquipment) -> AppResult<Equipment>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Equipment>(
        r#"
        INSERT INTO equipment (name, serial_number, location, department, purchase_date,
                               warranty_end, status, maintenance_team_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.serial_number)
    .bind(&data.location)
    .bind(&data.department)
    .bind(data.purchase_date)
    .bind(data.warranty_end)
    .bind(EquipmentStatus::Operational)
    .bind(data.maintenance_team_id)
    .fetch_one(executor)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(format!(
            "Equipment with serial number {} already exists",
            data.serial_number
        )),
        other => AppError::Database(other),
    })
}

/// Update the operability status, leaving every other column untouched
pub(super) async fn set_equipment_status<'e, E>(
    executor: E,
    id: i32,
    status: EquipmentStatus,
) -> AppResult<Option<Equipment>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, Equipment>(
        "UPDATE equipment SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}
