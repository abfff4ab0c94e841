use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, TokenError};
use thiserror::Error;

/// Returned for both an unknown e-mail and a wrong password.
pub const INVALID_CREDENTIALS: &str = "Username and/or password invalid.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User with email '{0}' already exists")]
    AlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyExists(_) => {
                AppError::Conflict("User with this e-mail already exists.".to_string())
            }
            AuthError::InvalidCredentials => AppError::BadRequest(INVALID_CREDENTIALS.to_string()),
            AuthError::Token(e) => AppError::InternalServerError(e.to_string()),
            AuthError::PasswordHash(msg) | AuthError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_invalid_credentials_is_bad_request() {
        let err = AppError::from(AuthError::InvalidCredentials).context("Login failed");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = err.to_response_body();
        assert_eq!(body.message, "Login failed");
        assert_eq!(body.cause, INVALID_CREDENTIALS);
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let err = AppError::from(AuthError::AlreadyExists("a@b.test".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_hash_failure_hides_detail() {
        let body = AppError::from(AuthError::PasswordHash("salt too short".into())).to_response_body();
        assert!(!body.cause.contains("salt"));
    }
}
