//! Reusable OpenAPI responses for the error body.

use super::ErrorResponse;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "message": "Request validation failed",
        "cause": "[Request validation] price must be greater than 0.",
        "errors": ["[Request validation] price must be greater than 0."]
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "message": "Invalid UUID format",
        "cause": "'abc' is not a valid UUID"
    })
)]
pub struct BadRequestUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - Missing, invalid or expired token",
    content_type = "application/json",
    example = json!({
        "message": "Unauthorized",
        "cause": "Invalid or expired token"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "message": "Resource not found",
        "cause": "Product with id 0190c4a2-5a0e-7c4b-9d0e-2f1b3c4d5e6f not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Resource already exists or is still referenced",
    content_type = "application/json",
    example = json!({
        "message": "Resource already exists",
        "cause": "Department with this name already exists in the database."
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "message": "Internal server error",
        "cause": "An unexpected error occurred."
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);
