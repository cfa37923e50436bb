//! Data models for GearGuard

pub mod enums;
pub mod equipment;
pub mod request;
pub mod team;
pub mod user;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use enums::{EquipmentStatus, Priority, RequestStatus, RequestType};
pub use equipment::{Equipment, EquipmentSummary};
pub use request::{MaintenanceRequest, RequestDetails};
pub use team::{Team, TeamWorkload};
pub use user::{User, UserShort};

/// Trim a required text field, rejecting values that are empty once trimmed.
pub fn required_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Parse a client-supplied date, either RFC 3339 or plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid {}: '{}'", field, value)))
}

/// Parse an optional date, treating empty strings as absent.
pub fn parse_optional_datetime(field: &str, value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_datetime(field, v).map(Some),
        _ => Ok(None),
    }
}
