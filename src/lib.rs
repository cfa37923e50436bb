//! GearGuard Maintenance Tracking
//!
//! REST JSON server for an equipment catalog, the maintenance requests raised
//! against it, and the kanban, calendar and dashboard views over those requests.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
