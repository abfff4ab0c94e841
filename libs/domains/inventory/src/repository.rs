use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{Department, Product};

/// Repository trait for Product persistence
///
/// Stock only changes through `increase_stock` and `decrease_stock`, which
/// implementations must apply atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, oldest first
    async fn list(&self) -> InventoryResult<Vec<Product>>;

    /// Products assigned to a department
    async fn list_by_department(&self, department_id: Uuid) -> InventoryResult<Vec<Product>>;

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Product>>;

    async fn create(&self, product: Product) -> InventoryResult<Product>;

    /// Persist name, price and department. `None` if the product is gone.
    async fn update(&self, product: Product) -> InventoryResult<Option<Product>>;

    async fn increase_stock(&self, id: Uuid, amount: i32) -> InventoryResult<Option<Product>>;

    /// Fails with `InsufficientStock` instead of going below zero.
    async fn decrease_stock(&self, id: Uuid, amount: i32) -> InventoryResult<Option<Product>>;

    /// Returns whether a row was deleted
    async fn delete(&self, id: Uuid) -> InventoryResult<bool>;
}

/// Repository trait for Department persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn list(&self) -> InventoryResult<Vec<Department>>;

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Department>>;

    /// Fails with `DuplicateDepartmentName` if the name is taken.
    async fn create(&self, department: Department) -> InventoryResult<Department>;

    async fn rename(&self, id: Uuid, name: String) -> InventoryResult<Option<Department>>;

    /// Fails with `DepartmentInUse` while products are assigned.
    async fn delete(&self, id: Uuid) -> InventoryResult<bool>;
}

/// Read-only department queries used while validating requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentLookup: Send + Sync {
    async fn department_exists(&self, id: Uuid) -> InventoryResult<bool>;

    async fn department_name_taken(&self, name: &str) -> InventoryResult<bool>;
}

/// In-memory store for products and departments (for development/testing)
///
/// Both maps share one value so the department reference on a product can be
/// checked the way a foreign key would. Locks are always taken departments
/// first.
#[derive(Debug, Default, Clone)]
pub struct InMemoryInventory {
    departments: Arc<RwLock<HashMap<Uuid, Department>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first<T>(mut items: Vec<T>, id: impl Fn(&T) -> Uuid) -> Vec<T> {
    items.sort_by_key(id);
    items
}

#[async_trait]
impl ProductRepository for InMemoryInventory {
    async fn list(&self) -> InventoryResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(oldest_first(products.values().cloned().collect(), |p| p.id))
    }

    async fn list_by_department(&self, department_id: Uuid) -> InventoryResult<Vec<Product>> {
        let products = self.products.read().await;
        let assigned = products
            .values()
            .filter(|p| p.department_id == Some(department_id))
            .cloned()
            .collect();
        Ok(oldest_first(assigned, |p| p.id))
    }

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn create(&self, product: Product) -> InventoryResult<Product> {
        let departments = self.departments.read().await;
        if let Some(department_id) = product.department_id {
            if !departments.contains_key(&department_id) {
                return Err(InventoryError::UnknownDepartment(department_id));
            }
        }

        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn update(&self, product: Product) -> InventoryResult<Option<Product>> {
        let departments = self.departments.read().await;
        if let Some(department_id) = product.department_id {
            if !departments.contains_key(&department_id) {
                return Err(InventoryError::UnknownDepartment(department_id));
            }
        }

        let mut products = self.products.write().await;
        let Some(stored) = products.get_mut(&product.id) else {
            return Ok(None);
        };
        stored.name = product.name;
        stored.price = product.price;
        stored.department_id = product.department_id;

        tracing::info!(product_id = %stored.id, "Updated product");
        Ok(Some(stored.clone()))
    }

    async fn increase_stock(&self, id: Uuid, amount: i32) -> InventoryResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        product.increase_quantity_in_stock(amount)?;
        Ok(Some(product.clone()))
    }

    async fn decrease_stock(&self, id: Uuid, amount: i32) -> InventoryResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        product.sell(amount)?;
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: Uuid) -> InventoryResult<bool> {
        let mut products = self.products.write().await;
        let deleted = products.remove(&id).is_some();
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryInventory {
    async fn list(&self) -> InventoryResult<Vec<Department>> {
        let departments = self.departments.read().await;
        Ok(oldest_first(departments.values().cloned().collect(), |d| d.id))
    }

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Department>> {
        let departments = self.departments.read().await;
        Ok(departments.get(&id).cloned())
    }

    async fn create(&self, department: Department) -> InventoryResult<Department> {
        let mut departments = self.departments.write().await;
        if departments.values().any(|d| d.name == department.name) {
            return Err(InventoryError::DuplicateDepartmentName(department.name));
        }
        departments.insert(department.id, department.clone());

        tracing::info!(department_id = %department.id, "Created department");
        Ok(department)
    }

    async fn rename(&self, id: Uuid, name: String) -> InventoryResult<Option<Department>> {
        let mut departments = self.departments.write().await;
        if departments.values().any(|d| d.id != id && d.name == name) {
            return Err(InventoryError::DuplicateDepartmentName(name));
        }
        let Some(department) = departments.get_mut(&id) else {
            return Ok(None);
        };
        department.name = name;

        tracing::info!(department_id = %id, "Renamed department");
        Ok(Some(department.clone()))
    }

    async fn delete(&self, id: Uuid) -> InventoryResult<bool> {
        let mut departments = self.departments.write().await;
        if !departments.contains_key(&id) {
            return Ok(false);
        }

        let products = self.products.read().await;
        if products.values().any(|p| p.department_id == Some(id)) {
            return Err(InventoryError::DepartmentInUse(id));
        }
        departments.remove(&id);

        tracing::info!(department_id = %id, "Deleted department");
        Ok(true)
    }
}

#[async_trait]
impl DepartmentLookup for InMemoryInventory {
    async fn department_exists(&self, id: Uuid) -> InventoryResult<bool> {
        let departments = self.departments.read().await;
        Ok(departments.contains_key(&id))
    }

    async fn department_name_taken(&self, name: &str) -> InventoryResult<bool> {
        let departments = self.departments.read().await;
        Ok(departments.values().any(|d| d.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn product_with_stock(store: &InMemoryInventory, quantity: i32) -> Product {
        let product = ProductRepository::create(store, Product::new("Widget", 2.5, None).unwrap())
            .await
            .unwrap();
        if quantity > 0 {
            store.increase_stock(product.id, quantity).await.unwrap();
        }
        product
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let store = InMemoryInventory::new();
        let product = product_with_stock(&store, 0).await;

        let fetched = ProductRepository::get_by_id(&store, product.id).await.unwrap();
        assert_eq!(fetched, Some(product));
    }

    #[tokio::test]
    async fn test_product_with_unknown_department_is_rejected() {
        let store = InMemoryInventory::new();
        let ghost = Uuid::now_v7();
        let product = Product::new("Widget", 1.0, Some(ghost)).unwrap();

        let err = ProductRepository::create(&store, product).await.unwrap_err();
        assert!(matches!(err, InventoryError::UnknownDepartment(id) if id == ghost));
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let store = InMemoryInventory::new();
        let mut product = product_with_stock(&store, 7).await;
        product.rename("Gadget").unwrap();

        let updated = ProductRepository::update(&store, product).await.unwrap().unwrap();
        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.quantity, 7);
    }

    #[tokio::test]
    async fn test_decrease_stock_never_goes_negative() {
        let store = InMemoryInventory::new();
        let product = product_with_stock(&store, 3).await;

        let err = store.decrease_stock(product.id, 4).await.unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientStock { available: 3, requested: 4 }));

        let left = store.decrease_stock(product.id, 3).await.unwrap().unwrap();
        assert_eq!(left.quantity, 0);
    }

    #[tokio::test]
    async fn test_concurrent_sells_do_not_oversell() {
        let store = InMemoryInventory::new();
        let product = product_with_stock(&store, 10).await;

        let sells = (0..25).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.decrease_stock(product.id, 1).await })
        });
        let results = futures::future::join_all(sells).await;
        let succeeded = results
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(Some(_)))))
            .count();

        assert_eq!(succeeded, 10);
        let left = ProductRepository::get_by_id(&store, product.id).await.unwrap().unwrap();
        assert_eq!(left.quantity, 0);
    }

    #[tokio::test]
    async fn test_missing_product_stock_change_is_none() {
        let store = InMemoryInventory::new();
        assert_eq!(store.increase_stock(Uuid::now_v7(), 1).await.unwrap(), None);
        assert!(!ProductRepository::delete(&store, Uuid::now_v7()).await.unwrap());
    }

    #[tokio::test]
    async fn test_department_names_are_unique() {
        let store = InMemoryInventory::new();
        DepartmentRepository::create(&store, Department::new("Tools"))
            .await
            .unwrap();

        let err = DepartmentRepository::create(&store, Department::new("Tools"))
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateDepartmentName(_)));
        assert!(store.department_name_taken("Tools").await.unwrap());
        assert!(!store.department_name_taken("tools").await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_into_taken_name_is_rejected() {
        let store = InMemoryInventory::new();
        let tools = DepartmentRepository::create(&store, Department::new("Tools"))
            .await
            .unwrap();
        DepartmentRepository::create(&store, Department::new("Garden"))
            .await
            .unwrap();

        let err = store.rename(tools.id, "Garden".to_string()).await.unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateDepartmentName(_)));

        let renamed = store.rename(tools.id, "Hardware".to_string()).await.unwrap();
        assert_eq!(renamed.map(|d| d.name), Some("Hardware".to_string()));
    }

    #[tokio::test]
    async fn test_department_in_use_cannot_be_deleted() {
        let store = InMemoryInventory::new();
        let department = DepartmentRepository::create(&store, Department::new("Tools"))
            .await
            .unwrap();
        let product = ProductRepository::create(
            &store,
            Product::new("Hammer", 9.99, Some(department.id)).unwrap(),
        )
        .await
        .unwrap();

        let err = DepartmentRepository::delete(&store, department.id)
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::DepartmentInUse(_)));

        let assigned = store.list_by_department(department.id).await.unwrap();
        assert_eq!(assigned.len(), 1);

        ProductRepository::delete(&store, product.id).await.unwrap();
        assert!(DepartmentRepository::delete(&store, department.id).await.unwrap());
        assert!(!store.department_exists(department.id).await.unwrap());
    }
}
