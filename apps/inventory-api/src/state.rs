//! Shared application state.

use axum_helpers::JwtAuth;

/// Everything the routers are built from. Cloning is cheap: the pool and the
/// signing keys are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    pub jwt: JwtAuth,
}
