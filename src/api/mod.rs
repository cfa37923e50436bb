//! API handlers for GearGuard REST endpoints

pub mod equipment;
pub mod health;
pub mod openapi;
pub mod requests;
pub mod stats;
pub mod teams;
pub mod users;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::AppState;

/// Routes mounted under `/api`
pub fn routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Reference data
        .route("/teams", get(teams::list_teams))
        .route("/users", get(users::list_users))
        // Equipment
        .route("/equipment", get(equipment::list_equipment).post(equipment::create_equipment))
        .route("/equipment/:id", get(equipment::get_equipment))
        .route("/equipment/:id/requests", get(equipment::equipment_history))
        // Maintenance requests
        .route("/requests", get(requests::list_requests).post(requests::create_request))
        .route("/requests/:id", get(requests::get_request))
        .route("/requests/:id/status", patch(requests::update_status))
        .route("/requests/:id/assign", patch(requests::assign_request))
        // Dashboard
        .route("/stats", get(stats::get_stats))
        .with_state(state)
}
