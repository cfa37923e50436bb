//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{enums::EquipmentStatus, team::Team};

/// Equipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    /// Manufacturer serial number (unique)
    pub serial_number: String,
    pub location: String,
    pub department: Option<String>,
    pub purchase_date: DateTime<Utc>,
    pub warranty_end: Option<DateTime<Utc>>,
    /// Operability, flipped to UNUSABLE when a request is scrapped
    pub status: EquipmentStatus,
    pub maintenance_team_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Equipment list entry with its team and the number of requests raised against it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub maintenance_team: Option<Team>,
    pub request_count: i64,
}

/// Register equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub department: Option<String>,
    /// Purchase date (RFC 3339 or YYYY-MM-DD)
    pub purchase_date: String,
    /// Warranty end date (RFC 3339 or YYYY-MM-DD)
    pub warranty_end: Option<String>,
    pub maintenance_team_id: Option<i32>,
}

/// Validated equipment ready for insertion (status is always OPERATIONAL)
#[derive(Debug, Clone)]
pub struct NewEquipment {
    pub name: String,
    pub serial_number: String,
    pub location: String,
    pub department: Option<String>,
    pub purchase_date: DateTime<Utc>,
    pub warranty_end: Option<DateTime<Utc>>,
    pub maintenance_team_id: Option<i32>,
}
