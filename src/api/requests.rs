//! Maintenance request API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RequestStatus,
        request::{CreateRequest, MaintenanceRequest, RequestDetails, RequestQuery},
    },
    AppState,
};

/// Status change body
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// NEW, IN_PROGRESS, REPAIRED or SCRAP
    pub status: String,
    /// Repair duration in hours (number or numeric string)
    #[schema(value_type = Option<i32>)]
    pub duration: Option<Value>,
}

/// Assignment body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub user_id: i32,
}

/// Read a duration sent either as a JSON number or a numeric string.
/// Fractional hours are truncated.
fn parse_duration(value: Option<&Value>) -> AppResult<Option<i32>> {
    let hours = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        Some(_) => None,
    };

    let hours = hours.ok_or_else(|| AppError::Validation("Duration must be a number".to_string()))?;
    i32::try_from(hours)
        .map(Some)
        .map_err(|_| AppError::Validation(format!("Duration {} is out of range", hours)))
}

/// List maintenance requests
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(RequestQuery),
    responses(
        (status = 200, description = "Requests with equipment and assignee", body = Vec<RequestDetails>)
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list(&query).await?;
    Ok(Json(requests))
}

/// Get a maintenance request
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.requests.get(id).await?;
    Ok(Json(request))
}

/// Report a breakdown or schedule preventive maintenance
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created with status NEW", body = MaintenanceRequest),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    Json(data): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<MaintenanceRequest>)> {
    let request = state.services.requests.create(&data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Change the status of a request (SCRAP also marks the equipment UNUSABLE)
#[utoipa::path(
    patch,
    path = "/requests/{id}/status",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated request", body = MaintenanceRequest),
        (status = 400, description = "Invalid status or duration", body = crate::error::ErrorResponse),
        (status = 404, description = "Request or equipment not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Transition refused by the workflow policy", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateStatusRequest>,
) -> AppResult<Json<MaintenanceRequest>> {
    let status: RequestStatus = data.status.parse().map_err(AppError::Validation)?;
    let duration = parse_duration(data.duration.as_ref())?;
    let request = state.services.requests.update_status(id, status, duration).await?;
    Ok(Json(request))
}

/// Assign a technician and move the request to IN_PROGRESS
#[utoipa::path(
    patch,
    path = "/requests/{id}/assign",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Updated request with assignee", body = RequestDetails),
        (status = 404, description = "Request or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn assign_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<AssignRequest>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.requests.assign(id, data.user_id).await?;
    Ok(Json(request))
}
