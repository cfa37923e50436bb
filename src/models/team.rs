//! Maintenance team model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Bucket used for requests whose equipment has no maintenance team
pub const UNASSIGNED_TEAM: &str = "Unassigned";

/// Maintenance team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub id: i32,
    pub name: String,
}

/// Number of requests handled by one team (dashboard chart entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamWorkload {
    /// Team name, or "Unassigned"
    pub name: String,
    /// Request count
    pub value: i64,
}
