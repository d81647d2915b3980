//! Shared application state for the app-level routes (`/ready`).
//!
//! Domain routes carry their own `UserService` state; this only holds
//! what the readiness check and shutdown cleanup need.

use database::postgres::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// `None` for the in-memory backend
    pub db: Option<DatabaseConnection>,
}
