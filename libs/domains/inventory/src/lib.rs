//! Inventory Domain
//!
//! Products, departments and stock movements.
//!
//! ```text
//! Handlers ──► ReferenceCheck (DepartmentLookup, read-only)
//!    │
//!    ▼
//! ProductService / DepartmentService
//!    │
//!    ▼
//! ProductRepository / DepartmentRepository
//!    ├── InMemoryInventory
//!    └── PgProductRepository / PgDepartmentRepository
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_inventory::{
//!     handlers, DepartmentService, InMemoryInventory, ProductService, ReferenceCheck,
//! };
//!
//! let store = InMemoryInventory::new();
//! let products = handlers::products_router(
//!     ProductService::new(store.clone()),
//!     ReferenceCheck::new(store.clone()),
//! );
//! let departments = handlers::departments_router(
//!     DepartmentService::new(store.clone(), store.clone()),
//!     ReferenceCheck::new(store),
//! );
//! ```

pub mod department_service;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod product_service;
pub mod repository;
pub mod validation;

pub use department_service::DepartmentService;
pub use error::{InventoryError, InventoryResult};
pub use models::{
    AssignDepartment, CreateProduct, Department, DepartmentAssignment, DepartmentDto,
    DepartmentName, Product, ProductDto, StockBalance, StockChange, UpdateProduct,
};
pub use postgres::{PgDepartmentRepository, PgProductRepository};
pub use product_service::ProductService;
pub use repository::{DepartmentLookup, DepartmentRepository, InMemoryInventory, ProductRepository};
pub use validation::ReferenceCheck;
