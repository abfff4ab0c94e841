use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{Department, DepartmentDto, ProductDto};
use crate::repository::{DepartmentRepository, ProductRepository};

/// Service layer for departments and their product listings
pub struct DepartmentService<D: DepartmentRepository, P: ProductRepository> {
    departments: Arc<D>,
    products: Arc<P>,
}

impl<D: DepartmentRepository, P: ProductRepository> Clone for DepartmentService<D, P> {
    fn clone(&self) -> Self {
        Self {
            departments: Arc::clone(&self.departments),
            products: Arc::clone(&self.products),
        }
    }
}

impl<D: DepartmentRepository, P: ProductRepository> DepartmentService<D, P> {
    pub fn new(departments: D, products: P) -> Self {
        Self {
            departments: Arc::new(departments),
            products: Arc::new(products),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_departments(&self) -> InventoryResult<Vec<DepartmentDto>> {
        let departments = self.departments.list().await?;
        Ok(departments.into_iter().map(DepartmentDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn create_new_department(&self, name: String) -> InventoryResult<DepartmentDto> {
        let created = self.departments.create(Department::new(name)).await?;
        Ok(created.into())
    }

    /// Rename only; assigned products keep pointing at the same id.
    #[instrument(skip(self), fields(department_id = %id))]
    pub async fn update_department(&self, id: Uuid, name: String) -> InventoryResult<DepartmentDto> {
        self.departments
            .rename(id, name)
            .await?
            .map(DepartmentDto::from)
            .ok_or(InventoryError::DepartmentNotFound(id))
    }

    #[instrument(skip(self), fields(department_id = %id))]
    pub async fn remove_department(&self, id: Uuid) -> InventoryResult<()> {
        if !self.departments.delete(id).await? {
            return Err(InventoryError::DepartmentNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(department_id = %id))]
    pub async fn get_department_products(&self, id: Uuid) -> InventoryResult<Vec<ProductDto>> {
        if self.departments.get_by_id(id).await?.is_none() {
            return Err(InventoryError::DepartmentNotFound(id));
        }

        let products = self.products.list_by_department(id).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }
}
