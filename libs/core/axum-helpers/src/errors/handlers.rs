use axum::{http::StatusCode, response::Response};

use super::error_response;

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "Resource not found",
        "The requested route does not exist",
    )
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed",
        "The HTTP method is not allowed for this resource",
    )
}
