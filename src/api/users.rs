//! User API endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::user::User, AppState};

/// List technicians that requests can be assigned to
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.staff.list_users().await?;
    Ok(Json(users))
}
