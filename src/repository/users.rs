//! Users domain methods on Repository

use sqlx::PgExecutor;

use super::Repository;
use crate::{
    error::AppResult,
    models::user::User,
};

impl Repository {
    /// List all users (assignment candidates)
    pub async fn users_list(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Get user by ID
pub(super) async fn find_user<'e, E>(executor: E, id: i32) -> AppResult<Option<User>>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}
