use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, Statement,
};
use uuid::Uuid;

use crate::{
    entity::{department, product},
    error::{InventoryError, InventoryResult},
    models::{Department, Product},
    repository::{DepartmentLookup, DepartmentRepository, ProductRepository},
};

const PRODUCT_COLUMNS: &str = "id, name, price, quantity, department_id, created_at, updated_at";

fn is_unique_violation(err: &DbErr) -> bool {
    let err_str = err.to_string();
    err_str.contains("duplicate key") || err_str.contains("unique constraint")
}

fn is_foreign_key_violation(err: &DbErr) -> bool {
    err.to_string().contains("foreign key")
}

fn is_out_of_range(err: &DbErr) -> bool {
    err.to_string().contains("out of range")
}

/// PostgreSQL implementation of ProductRepository
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn returning_one(&self, stmt: Statement) -> Result<Option<Product>, DbErr> {
        let row = product::Model::find_by_statement(stmt).one(&self.db).await?;
        Ok(row.map(Product::from))
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> InventoryResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(InventoryError::database)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn list_by_department(&self, department_id: Uuid) -> InventoryResult<Vec<Product>> {
        let models = product::Entity::find()
            .filter(product::Column::DepartmentId.eq(department_id))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(InventoryError::database)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(InventoryError::database)?;

        Ok(model.map(Product::from))
    }

    async fn create(&self, input: Product) -> InventoryResult<Product> {
        let now = chrono::Utc::now();
        let active_model = product::ActiveModel {
            id: Set(input.id),
            name: Set(input.name),
            price: Set(input.price),
            quantity: Set(input.quantity),
            department_id: Set(input.department_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match input.department_id {
                Some(department_id) if is_foreign_key_violation(&e) => {
                    InventoryError::UnknownDepartment(department_id)
                }
                _ => InventoryError::database(e),
            }
        })?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, input: Product) -> InventoryResult<Option<Product>> {
        let sql = format!(
            r#"
            UPDATE products
            SET name = $2, price = $3, department_id = $4, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                input.id.into(),
                input.name.clone().into(),
                input.price.into(),
                input.department_id.into(),
            ],
        );

        let updated = self.returning_one(stmt).await.map_err(|e| {
            match input.department_id {
                Some(department_id) if is_foreign_key_violation(&e) => {
                    InventoryError::UnknownDepartment(department_id)
                }
                _ => InventoryError::database(e),
            }
        })?;

        if updated.is_some() {
            tracing::info!(product_id = %input.id, "Updated product");
        }
        Ok(updated)
    }

    async fn increase_stock(&self, id: Uuid, amount: i32) -> InventoryResult<Option<Product>> {
        let sql = format!(
            r#"
            UPDATE products
            SET quantity = quantity + $2, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into(), amount.into()]);

        self.returning_one(stmt).await.map_err(|e| {
            if is_out_of_range(&e) {
                InventoryError::Validation {
                    field: "amount",
                    message: "exceeds the maximum stock quantity.".to_string(),
                }
            } else {
                InventoryError::database(e)
            }
        })
    }

    async fn decrease_stock(&self, id: Uuid, amount: i32) -> InventoryResult<Option<Product>> {
        let sql = format!(
            r#"
            UPDATE products
            SET quantity = quantity - $2, updated_at = now()
            WHERE id = $1 AND quantity >= $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into(), amount.into()]);

        if let Some(sold) = self
            .returning_one(stmt)
            .await
            .map_err(InventoryError::database)?
        {
            return Ok(Some(sold));
        }

        // Nothing matched: either the product is gone or the stock is short.
        match self.get_by_id(id).await? {
            None => Ok(None),
            Some(product) => Err(InventoryError::InsufficientStock {
                available: product.quantity,
                requested: amount,
            }),
        }
    }

    async fn delete(&self, id: Uuid) -> InventoryResult<bool> {
        let result = product::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(InventoryError::database)?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }
}

/// PostgreSQL implementation of DepartmentRepository and DepartmentLookup
#[derive(Clone)]
pub struct PgDepartmentRepository {
    db: DatabaseConnection,
}

impl PgDepartmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentRepository for PgDepartmentRepository {
    async fn list(&self) -> InventoryResult<Vec<Department>> {
        let models = department::Entity::find()
            .order_by_asc(department::Column::Id)
            .all(&self.db)
            .await
            .map_err(InventoryError::database)?;

        Ok(models.into_iter().map(Department::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Department>> {
        let model = department::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(InventoryError::database)?;

        Ok(model.map(Department::from))
    }

    async fn create(&self, input: Department) -> InventoryResult<Department> {
        let active_model = department::ActiveModel {
            id: Set(input.id),
            name: Set(input.name.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                InventoryError::DuplicateDepartmentName(input.name.clone())
            } else {
                InventoryError::database(e)
            }
        })?;

        tracing::info!(department_id = %model.id, "Created department");
        Ok(model.into())
    }

    async fn rename(&self, id: Uuid, name: String) -> InventoryResult<Option<Department>> {
        let sql = "UPDATE departments SET name = $2 WHERE id = $1 RETURNING id, name, created_at";

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [id.into(), name.clone().into()],
        );

        let model = department::Model::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    InventoryError::DuplicateDepartmentName(name.clone())
                } else {
                    InventoryError::database(e)
                }
            })?;

        if model.is_some() {
            tracing::info!(department_id = %id, "Renamed department");
        }
        Ok(model.map(Department::from))
    }

    async fn delete(&self, id: Uuid) -> InventoryResult<bool> {
        let result = department::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    InventoryError::DepartmentInUse(id)
                } else {
                    InventoryError::database(e)
                }
            })?;

        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(department_id = %id, "Deleted department");
        }
        Ok(deleted)
    }
}

#[async_trait]
impl DepartmentLookup for PgDepartmentRepository {
    async fn department_exists(&self, id: Uuid) -> InventoryResult<bool> {
        Ok(DepartmentRepository::get_by_id(self, id).await?.is_some())
    }

    async fn department_name_taken(&self, name: &str) -> InventoryResult<bool> {
        let model = department::Entity::find()
            .filter(department::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(InventoryError::database)?;

        Ok(model.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn product_model(quantity: i32) -> product::Model {
        let now = chrono::Utc::now().into();
        product::Model {
            id: Uuid::now_v7(),
            name: "Widget".to_string(),
            price: 10.0,
            quantity,
            department_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_short_stock_reports_available_quantity() {
        let stored = product_model(10);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let err = repo.decrease_stock(stored.id, 20).await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientStock {
                available: 10,
                requested: 20
            }
        ));
    }

    #[tokio::test]
    async fn test_sell_on_missing_product_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert_eq!(repo.decrease_stock(Uuid::now_v7(), 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.delete(Uuid::now_v7()).await.unwrap());
        assert!(!repo.delete(Uuid::now_v7()).await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"departments_name_key\"".into(),
            )])
            .into_connection();
        let repo = PgDepartmentRepository::new(db);

        let err = DepartmentRepository::create(&repo, Department::new("Tools"))
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::DuplicateDepartmentName(name) if name == "Tools"));
    }

    #[tokio::test]
    async fn test_foreign_key_violation_maps_to_department_in_use() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom(
                "update or delete on table \"departments\" violates foreign key constraint".into(),
            )])
            .into_connection();
        let repo = PgDepartmentRepository::new(db);

        let err = DepartmentRepository::delete(&repo, id).await.unwrap_err();
        assert!(matches!(err, InventoryError::DepartmentInUse(d) if d == id));
    }
}
