use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    check_amount, CreateProduct, DepartmentAssignment, Product, ProductDto, StockBalance,
    UpdateProduct,
};
use crate::repository::ProductRepository;

/// Service layer for stock and product catalogue operations
///
/// Department references in the inputs are expected to be checked already
/// (see [`ReferenceCheck`](crate::validation::ReferenceCheck)).
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    async fn find(&self, id: Uuid) -> InventoryResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(InventoryError::ProductNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_inventory(&self) -> InventoryResult<Vec<ProductDto>> {
        let products = self.repository.list().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_info(&self, id: Uuid) -> InventoryResult<ProductDto> {
        self.find(id).await.map(ProductDto::from)
    }

    /// Register a product with an empty stock.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn add_product(&self, input: CreateProduct) -> InventoryResult<StockBalance> {
        let product = Product::new(input.name, input.price, input.department_id)?;
        let created = self.repository.create(product).await?;
        Ok(StockBalance::from(&created))
    }

    /// Apply a partial update. Stock is not touched.
    #[instrument(skip(self, changes), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: Uuid,
        changes: UpdateProduct,
    ) -> InventoryResult<ProductDto> {
        let mut product = self.find(id).await?;
        product.apply_update(changes)?;

        self.repository
            .update(product)
            .await?
            .map(ProductDto::from)
            .ok_or(InventoryError::ProductNotFound(id))
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn assign_department_to_product(
        &self,
        id: Uuid,
        department_id: Uuid,
    ) -> InventoryResult<DepartmentAssignment> {
        let mut product = self.find(id).await?;
        product.assign_department(Some(department_id));

        let updated = self
            .repository
            .update(product)
            .await?
            .ok_or(InventoryError::ProductNotFound(id))?;

        Ok(DepartmentAssignment {
            id: updated.id,
            product_name: updated.name,
            department_id,
        })
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn buy_product(&self, id: Uuid, amount: i32) -> InventoryResult<StockBalance> {
        check_amount(amount)?;

        let product = self
            .repository
            .increase_stock(id, amount)
            .await?
            .ok_or(InventoryError::ProductNotFound(id))?;

        tracing::info!(product_id = %id, amount, balance = product.quantity, "Stock bought");
        Ok(StockBalance::from(&product))
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn sell_product(&self, id: Uuid, amount: i32) -> InventoryResult<StockBalance> {
        check_amount(amount)?;

        let product = self
            .repository
            .decrease_stock(id, amount)
            .await?
            .ok_or(InventoryError::ProductNotFound(id))?;

        tracing::info!(product_id = %id, amount, balance = product.quantity, "Stock sold");
        Ok(StockBalance::from(&product))
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_product(&self, id: Uuid) -> InventoryResult<()> {
        if !self.repository.delete(id).await? {
            return Err(InventoryError::ProductNotFound(id));
        }
        Ok(())
    }
}
