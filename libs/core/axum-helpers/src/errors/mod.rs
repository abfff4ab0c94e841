pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Prefix of every itemized validation message.
pub const VALIDATION_PREFIX: &str = "[Request validation]";

/// `cause` reported for server-side failures; the detail only goes to the log.
pub const INTERNAL_CAUSE: &str = "An unexpected error occurred.";

/// Body of every error response.
///
/// ```json
/// {
///   "message": "Sell operation failed",
///   "cause": "Insufficient stock: 10 available, 20 requested"
/// }
/// ```
///
/// `errors` is only present for validation failures and lists one entry per
/// offending field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short summary of what failed
    pub message: String,
    /// The specific reason
    pub cause: String,
    /// Itemized validation messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Application error, converted to an HTTP response in exactly one place.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    /// Validation failures found outside the `validator` derive, already itemized.
    #[error("Invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    /// Replaces the response `message` with an operation summary.
    #[error("{message}: {source}")]
    WithContext {
        message: String,
        source: Box<AppError>,
    },
}

impl AppError {
    /// A single validation failure for `field`.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::InvalidInput(vec![format!("{} {} {}", VALIDATION_PREFIX, field, message)])
    }

    /// Attach an operation summary such as "Sell operation failed".
    pub fn context(self, message: impl Into<String>) -> Self {
        AppError::WithContext {
            message: message.into(),
            source: Box::new(self),
        }
    }

    fn root(&self) -> &AppError {
        match self {
            AppError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.root() {
            AppError::JsonExtractorRejection(_)
            | AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidUuid(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::WithContext { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self.root() {
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::ValidationError(_) | AppError::InvalidInput(_) => ErrorCode::ValidationError,
            AppError::InvalidUuid(_) => ErrorCode::InvalidUuid,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::InternalServerError(_) | AppError::WithContext { .. } => ErrorCode::InternalError,
        }
    }

    /// Build the public body. Server-side details are replaced by [`INTERNAL_CAUSE`].
    pub fn to_response_body(&self) -> ErrorResponse {
        let message = match self {
            AppError::WithContext { message, .. } => message.clone(),
            _ => self.error_code().default_message().to_string(),
        };

        let (cause, errors) = match self.root() {
            AppError::JsonExtractorRejection(e) => {
                let item = format!("{} body {}", VALIDATION_PREFIX, e.body_text());
                (e.body_text(), vec![item])
            }
            AppError::ValidationError(e) => {
                let items = validation_messages(e);
                (items.join("; "), items)
            }
            AppError::InvalidInput(items) => (items.join("; "), items.clone()),
            AppError::InvalidUuid(raw) => (format!("'{}' is not a valid UUID", raw), Vec::new()),
            AppError::BadRequest(cause)
            | AppError::Unauthorized(cause)
            | AppError::NotFound(cause)
            | AppError::Conflict(cause) => (cause.clone(), Vec::new()),
            AppError::InternalServerError(_) | AppError::WithContext { .. } => {
                (INTERNAL_CAUSE.to_string(), Vec::new())
            }
        };

        ErrorResponse {
            message,
            cause,
            errors,
        }
    }
}

/// Flatten `validator` output into sorted `"[Request validation] <field> <message>"` lines.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut items: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |err| {
                let detail = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", err.code));
                format!("{} {} {}", VALIDATION_PREFIX, field, detail)
            })
        })
        .collect();
    items.sort();
    items
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        (status, Json(self.to_response_body())).into_response()
    }
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: &str, cause: &str) -> Response {
    let body = ErrorResponse {
        message: message.to_string(),
        cause: cause.to_string(),
        errors: Vec::new(),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "must have at least one character."))]
        name: String,
        #[validate(range(exclusive_min = 0.0, message = "must be greater than 0."))]
        price: f64,
    }

    async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InternalServerError("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NotFound("x".into()).context("Product lookup failed").status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_messages_are_itemized_and_sorted() {
        let sample = Sample {
            name: String::new(),
            price: 0.0,
        };
        let errors = sample.validate().unwrap_err();

        assert_eq!(
            validation_messages(&errors),
            vec![
                "[Request validation] name must have at least one character.".to_string(),
                "[Request validation] price must be greater than 0.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_context_replaces_message_but_keeps_status() {
        let err = AppError::BadRequest("Insufficient stock: 1 available, 2 requested".into())
            .context("Sell operation failed");

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Sell operation failed");
        assert_eq!(body.cause, "Insufficient stock: 1 available, 2 requested");
        assert!(body.errors.is_empty());
    }

    #[tokio::test]
    async fn test_internal_details_are_not_exposed() {
        let (status, body) = body_of(AppError::InternalServerError("pool exhausted".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.cause, INTERNAL_CAUSE);
    }

    #[tokio::test]
    async fn test_invalid_field_lists_errors() {
        let err = AppError::invalid_field("departmentId", "Department ID does not exist in the database.");
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Request validation failed");
        assert_eq!(
            body.errors,
            vec!["[Request validation] departmentId Department ID does not exist in the database.".to_string()]
        );
    }
}
