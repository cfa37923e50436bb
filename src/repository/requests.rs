//! Maintenance requests domain methods on Repository

use sqlx::{postgres::PgRow, FromRow, PgExecutor, Row};

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        equipment::Equipment,
        request::{MaintenanceRequest, NewRequest, RequestChange, RequestDetails, RequestQuery},
        team::{TeamWorkload, UNASSIGNED_TEAM},
        user::UserShort,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT r.*,
           e.name AS e_name, e.serial_number AS e_serial_number, e.location AS e_location,
           e.department AS e_department, e.purchase_date AS e_purchase_date,
           e.warranty_end AS e_warranty_end, e.status AS e_status,
           e.maintenance_team_id AS e_maintenance_team_id, e.created_at AS e_created_at,
           u.name AS u_name, u.avatar AS u_avatar
    FROM maintenance_requests r
    JOIN equipment e ON e.id = r.equipment_id
    LEFT JOIN users u ON u.id = r.assigned_to_id
"#;

impl Repository {
    /// List requests, optionally restricted to one team's equipment and/or one type
    pub async fn requests_list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        let sql = format!(
            "{} WHERE ($1::int IS NULL OR e.maintenance_team_id = $1) \
               AND ($2::text IS NULL OR r.request_type = $2) \
             ORDER BY r.id",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(query.team_id)
            .bind(query.request_type)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(details_from_row).collect()
    }

    /// Get one request with equipment and assignee
    pub async fn requests_get(&self, id: i32) -> AppResult<Option<RequestDetails>> {
        let sql = format!("{} WHERE r.id = $1", DETAILS_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(details_from_row).transpose()
    }

    /// Request history for one equipment, newest first
    pub async fn requests_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceRequest>> {
        let rows = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT * FROM maintenance_requests
            WHERE equipment_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count requests per team owning the equipment
    pub async fn requests_count_by_team(&self) -> AppResult<Vec<TeamWorkload>> {
        let rows = sqlx::query_as::<_, TeamWorkload>(
            r#"
            SELECT COALESCE(t.name, $1) AS name, COUNT(*)::bigint AS value
            FROM maintenance_requests r
            JOIN equipment e ON e.id = r.equipment_id
            LEFT JOIN teams t ON t.id = e.maintenance_team_id
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(UNASSIGNED_TEAM)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn details_from_row(row: &PgRow) -> AppResult<RequestDetails> {
    let request = MaintenanceRequest::from_row(row)?;

    let equipment = Equipment {
        id: request.equipment_id,
        name: row.try_get("e_name")?,
        serial_number: row.try_get("e_serial_number")?,
        location: row.try_get("e_location")?,
        department: row.try_get("e_department")?,
        purchase_date: row.try_get("e_purchase_date")?,
        warranty_end: row.try_get("e_warranty_end")?,
        status: row.try_get("e_status")?,
        maintenance_team_id: row.try_get("e_maintenance_team_id")?,
        created_at: row.try_get("e_created_at")?,
    };

    let assigned_to = match (request.assigned_to_id, row.try_get::<Option<String>, _>("u_name")?) {
        (Some(id), Some(name)) => Some(UserShort {
            id,
            name,
            avatar: row.try_get("u_avatar")?,
        }),
        _ => None,
    };

    Ok(RequestDetails {
        request,
        equipment,
        assigned_to,
    })
}

/// Load a request and lock its row until the transaction ends
pub(super) async fn find_request_for_update<'e, E>(
    executor: E,
    id: i32,
) -> AppResult<Option<MaintenanceRequest>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, MaintenanceRequest>(
        "SELECT * FROM maintenance_requests WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Insert a request; status always starts as NEW (column default)
pub(super) async fn insert_request<'e, E>(executor: E, data: &NewRequest) -> AppResult<MaintenanceRequest>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, MaintenanceRequest>(
        r#"
        INSERT INTO maintenance_requests (title, description, request_type, priority,
                                          equipment_id, scheduled_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.request_type)
    .bind(data.priority)
    .bind(data.equipment_id)
    .bind(data.scheduled_date)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

/// Apply a partial update; `None` fields keep their stored value
pub(super) async fn update_request<'e, E>(
    executor: E,
    id: i32,
    change: &RequestChange,
) -> AppResult<Option<MaintenanceRequest>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, MaintenanceRequest>(
        r#"
        UPDATE maintenance_requests
        SET status = COALESCE($2, status),
            duration = COALESCE($3, duration),
            assigned_to_id = COALESCE($4, assigned_to_id)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(change.status)
    .bind(change.duration)
    .bind(change.assigned_to_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}
