//! HTTP handlers. Each one extracts, runs reference checks, then makes a
//! single service call.

pub mod departments;
pub mod products;

use axum_helpers::AppError;

use crate::error::InventoryError;

pub use departments::{DepartmentsApiDoc, departments_router};
pub use products::{ProductsApiDoc, products_router};

/// Convert a domain error and label it with the failed operation.
fn failed(operation: &'static str) -> impl FnOnce(InventoryError) -> AppError {
    move |err| AppError::from(err).context(operation)
}
