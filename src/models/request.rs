//! Maintenance request (ticket) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    enums::{Priority, RequestStatus, RequestType},
    equipment::Equipment,
    user::UserShort,
};

/// Maintenance request record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub priority: Priority,
    pub status: RequestStatus,
    pub equipment_id: i32,
    pub assigned_to_id: Option<i32>,
    /// Planned date for preventive tasks
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Repair duration in hours
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Request with its equipment and assignee resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: MaintenanceRequest,
    pub equipment: Equipment,
    pub assigned_to: Option<UserShort>,
}

/// Create request payload.
///
/// `type` and `priority` arrive as strings and are checked against the
/// enumerations by the service so that bad values surface as validation errors.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    /// CORRECTIVE or PREVENTIVE
    #[serde(rename = "type")]
    pub request_type: String,
    /// LOW, MEDIUM or HIGH
    pub priority: String,
    pub equipment_id: i32,
    /// Scheduled date (RFC 3339 or YYYY-MM-DD)
    pub scheduled_date: Option<String>,
    /// Ignored: new requests always start as NEW
    pub status: Option<String>,
}

/// Validated request ready for insertion
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub title: String,
    pub description: Option<String>,
    pub request_type: RequestType,
    pub priority: Priority,
    pub equipment_id: i32,
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// Partial update applied inside a lifecycle transaction.
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestChange {
    pub status: Option<RequestStatus>,
    pub duration: Option<i32>,
    pub assigned_to_id: Option<i32>,
}

/// Query filter for listing requests
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RequestQuery {
    /// Only requests whose equipment belongs to this team
    pub team_id: Option<i32>,
    /// Only requests of this type
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_type_matches_create_parsing() {
        let query: RequestQuery =
            serde_json::from_value(json!({ "teamId": 2, "type": "preventive" })).unwrap();
        assert_eq!(query.team_id, Some(2));
        assert_eq!(query.request_type, Some(RequestType::Preventive));
        assert_eq!(query.request_type, "preventive".parse().ok());

        let query: RequestQuery = serde_json::from_value(json!({})).unwrap();
        assert!(query.team_id.is_none() && query.request_type.is_none());

        assert!(serde_json::from_value::<RequestQuery>(json!({ "type": "urgent" })).is_err());
    }
}
