//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipment, health, requests, stats, teams, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GearGuard API",
        version = "0.1.0",
        description = "Maintenance tracking REST API"
    ),
    servers(
        (url = "/api", description = "GearGuard API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Reference data
        teams::list_teams,
        users::list_users,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::equipment_history,
        // Requests
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::update_status,
        requests::assign_request,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            crate::models::enums::RequestStatus,
            crate::models::enums::RequestType,
            crate::models::enums::Priority,
            crate::models::enums::EquipmentStatus,
            crate::models::team::Team,
            crate::models::team::TeamWorkload,
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentSummary,
            crate::models::equipment::CreateEquipment,
            crate::models::request::MaintenanceRequest,
            crate::models::request::RequestDetails,
            crate::models::request::CreateRequest,
            requests::UpdateStatusRequest,
            requests::AssignRequest,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "teams", description = "Maintenance teams"),
        (name = "users", description = "Technicians"),
        (name = "equipment", description = "Equipment catalog and history"),
        (name = "requests", description = "Maintenance request workflow"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
