//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs carrying `{userId, iat, exp}` and live for one hour.
//! [`jwt_auth_middleware`] verifies the signature and expiry, then asks a
//! [`UserLookup`] whether the user still exists.
//!
//! ```ignore
//! let jwt = JwtAuth::new(&JwtConfig::from_env()?);
//! let auth = AuthState::new(jwt, Arc::new(user_repository));
//!
//! let protected = Router::new()
//!     .route("/products", get(list))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{Claims, JwtAuth, TOKEN_TTL_SECS, TokenError};
pub use middleware::{AuthState, UserLookup, jwt_auth_middleware};
