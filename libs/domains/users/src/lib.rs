//! Users Domain
//!
//! Account registration and login. Passwords are stored as Argon2 hashes;
//! successful calls return an HS256 token from [`axum_helpers::JwtAuth`].
//!
//! The repositories also implement [`axum_helpers::UserLookup`], so the same
//! store backs the authentication middleware.
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{handlers, AuthService, InMemoryUserRepository};
//!
//! let jwt = JwtAuth::new(&JwtConfig::new("a-signing-secret-of-at-least-32-chars").unwrap());
//! let router = handlers::auth_router(AuthService::new(InMemoryUserRepository::new(), jwt));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use handlers::{AuthApiDoc, auth_router};
pub use models::{Credentials, TokenResponse, User};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{AuthService, SignedIn};
