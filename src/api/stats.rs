//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::team::TeamWorkload, AppState};

/// Request count per maintenance team (dashboard chart)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Requests grouped by team name", body = Vec<TeamWorkload>)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<Vec<TeamWorkload>>> {
    let stats = state.services.stats.team_workload().await?;
    Ok(Json(stats))
}
