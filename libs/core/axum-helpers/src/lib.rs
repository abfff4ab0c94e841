//! # Axum Helpers
//!
//! Shared HTTP plumbing for the inventory service.
//!
//! ## Modules
//!
//! - **[`auth`]**: HS256 bearer tokens and the authentication middleware
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: [`AppError`] and the `{message, cause}` error body
//! - **[`extractors`]**: UUID path and validated JSON extractors
//! - **[`audit`]**: audit log events

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{AuthState, Claims, JwtAuth, JwtConfig, TokenError, UserLookup, jwt_auth_middleware};

pub use server::{
    API_BASE_PATH, HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
