//! Teams domain methods on Repository

use sqlx::PgExecutor;

use super::Repository;
use crate::{
    error::AppResult,
    models::team::Team,
};

impl Repository {
    /// List all maintenance teams
    pub async fn teams_list(&self) -> AppResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, Team>("SELECT * FROM teams ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Get team by ID
pub(super) async fn find_team<'e, E>(executor: E, id: i32) -> AppResult<Option<Team>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}
