//! Team API endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::team::Team, AppState};

/// List maintenance teams
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses(
        (status = 200, description = "Teams", body = Vec<Team>)
    )
)]
pub async fn list_teams(State(state): State<AppState>) -> AppResult<Json<Vec<Team>>> {
    let teams = state.services.staff.list_teams().await?;
    Ok(Json(teams))
}
