use super::jwt::JwtAuth;
use crate::errors::AppError;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// Read-only view of the user store used to reject tokens of deleted users.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn user_exists(&self, user_id: Uuid) -> Result<bool, String>;
}

/// State for [`jwt_auth_middleware`].
#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtAuth,
    pub users: Arc<dyn UserLookup>,
}

impl AuthState {
    pub fn new(jwt: JwtAuth, users: Arc<dyn UserLookup>) -> Self {
        Self { jwt, users }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Require `Authorization: Bearer <token>` for every request behind this layer.
///
/// On success the verified [`Claims`](super::Claims) are inserted into the
/// request extensions.
pub async fn jwt_auth_middleware(
    State(auth): State<AuthState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        tracing::debug!("No bearer token on request");
        AppError::Unauthorized("No token provided".to_string())
    })?;

    let claims = auth.jwt.verify_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let exists = auth
        .users
        .user_exists(claims.user_id)
        .await
        .map_err(|e| AppError::InternalServerError(format!("user lookup failed: {}", e)))?;

    if !exists {
        tracing::info!(user_id = %claims.user_id, "Token belongs to a user that no longer exists");
        return Err(AppError::Unauthorized("User no longer exists".to_string()));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
