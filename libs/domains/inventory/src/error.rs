use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Product with id {0} not found")]
    ProductNotFound(Uuid),

    #[error("Department with id {0} not found")]
    DepartmentNotFound(Uuid),

    #[error("Department with name '{0}' already exists")]
    DuplicateDepartmentName(String),

    #[error("Department {0} still has products assigned")]
    DepartmentInUse(Uuid),

    #[error("Department {0} does not exist")]
    UnknownDepartment(Uuid),

    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl InventoryError {
    pub(crate) fn database(err: impl std::fmt::Display) -> Self {
        InventoryError::Internal(format!("Database error: {}", err))
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product with id {} not found", id))
            }
            InventoryError::DepartmentNotFound(id) => {
                AppError::NotFound(format!("Department with id {} not found", id))
            }
            InventoryError::DuplicateDepartmentName(_) => AppError::Conflict(
                "Department with this name already exists in the database.".to_string(),
            ),
            InventoryError::DepartmentInUse(_) => {
                AppError::Conflict("Department still has products assigned".to_string())
            }
            InventoryError::UnknownDepartment(_) => AppError::invalid_field(
                "departmentId",
                "Department ID does not exist in the database.",
            ),
            InventoryError::InsufficientStock {
                available,
                requested,
            } => AppError::BadRequest(format!(
                "Insufficient stock: {} available, {} requested",
                available, requested
            )),
            InventoryError::Validation { field, message } => {
                AppError::invalid_field(field, &message)
            }
            InventoryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for InventoryError {
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
    fn test_status_mapping() {
        let id = Uuid::now_v7();
        let cases = [
            (InventoryError::ProductNotFound(id), StatusCode::NOT_FOUND),
            (InventoryError::DepartmentNotFound(id), StatusCode::NOT_FOUND),
            (
                InventoryError::DuplicateDepartmentName("Tools".into()),
                StatusCode::CONFLICT,
            ),
            (InventoryError::DepartmentInUse(id), StatusCode::CONFLICT),
            (InventoryError::UnknownDepartment(id), StatusCode::BAD_REQUEST),
            (
                InventoryError::InsufficientStock {
                    available: 1,
                    requested: 2,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                InventoryError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_insufficient_stock_cause() {
        let body = AppError::from(InventoryError::InsufficientStock {
            available: 10,
            requested: 20,
        })
        .context("Sell operation failed")
        .to_response_body();

        assert_eq!(body.message, "Sell operation failed");
        assert_eq!(body.cause, "Insufficient stock: 10 available, 20 requested");
        assert!(body.errors.is_empty());
    }

    #[test]
    fn test_unknown_department_is_itemized() {
        let body = AppError::from(InventoryError::UnknownDepartment(Uuid::now_v7())).to_response_body();
        assert_eq!(
            body.errors,
            vec!["[Request validation] departmentId Department ID does not exist in the database."]
        );
    }
}
