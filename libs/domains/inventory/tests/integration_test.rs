//! Integration tests for the inventory domain
//!
//! These run against real PostgreSQL via testcontainers:
//! - conditional stock updates never drive quantity negative
//! - unique and foreign key constraints map to domain errors
//! - department listings follow the `department_id` column

use domain_inventory::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

async fn seeded_product(repo: &PgProductRepository, name: String, quantity: i32) -> Product {
    let product = repo
        .create(Product::new(name, 10.0, None).unwrap())
        .await
        .unwrap();
    if quantity > 0 {
        repo.increase_stock(product.id, quantity).await.unwrap();
    }
    product
}

#[tokio::test]
async fn test_create_and_get_product() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get_product");

    let created = seeded_product(&repo, builder.name("product", "main"), 0).await;
    assert_eq!(created.quantity, 0);

    let fetched = assert_some(repo.get_by_id(created.id).await.unwrap(), "product should exist");
    assert_uuid_eq(fetched.id, created.id, "fetched product id");
    assert_eq!(fetched.price, 10.0);
}

#[tokio::test]
async fn test_stock_movements_are_conditional() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("stock_movements");
    let product = seeded_product(&repo, builder.name("product", "stock"), 10).await;

    let bought = repo.increase_stock(product.id, 5).await.unwrap().unwrap();
    assert_eq!(bought.quantity, 15);

    let err = repo.decrease_stock(product.id, 20).await.unwrap_err();
    assert!(matches!(
        err,
        InventoryError::InsufficientStock {
            available: 15,
            requested: 20
        }
    ));

    let sold = repo.decrease_stock(product.id, 15).await.unwrap().unwrap();
    assert_eq!(sold.quantity, 0);

    let missing = builder.unknown_id();
    assert_eq!(repo.decrease_stock(missing, 1).await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_sells_never_oversell() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("concurrent_sells");
    let product = seeded_product(&repo, builder.name("product", "hot"), 10).await;

    let sells = (0..20).map(|_| {
        let repo = repo.clone();
        async move { repo.decrease_stock(product.id, 1).await }
    });
    let results = futures::future::join_all(sells).await;

    let succeeded = results.iter().filter(|r| matches!(r, Ok(Some(_)))).count();
    assert_eq!(succeeded, 10);

    let left = repo.get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(left.quantity, 0);
}

#[tokio::test]
async fn test_update_does_not_touch_stock() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_keeps_stock");
    let mut product = seeded_product(&repo, builder.name("product", "before"), 4).await;

    product.rename(builder.name("product", "after")).unwrap();
    product.reprice(99.5).unwrap();
    let updated = repo.update(product).await.unwrap().unwrap();

    assert_eq!(updated.name, builder.name("product", "after"));
    assert_eq!(updated.price, 99.5);
    assert_eq!(updated.quantity, 4);
}

#[tokio::test]
async fn test_department_name_is_unique() {
    let db = TestDatabase::new().await;
    let repo = PgDepartmentRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("department_unique");
    let name = builder.name("department", "dup");

    repo.create(Department::new(name.clone())).await.unwrap();
    assert!(repo.department_name_taken(&name).await.unwrap());

    let err = repo.create(Department::new(name)).await.unwrap_err();
    assert!(matches!(err, InventoryError::DuplicateDepartmentName(_)));
}

#[tokio::test]
async fn test_unknown_department_reference_is_rejected() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("unknown_department_fk");
    let ghost = builder.unknown_id();

    let product = Product::new(builder.name("product", "orphan"), 1.0, Some(ghost)).unwrap();
    let err = repo.create(product).await.unwrap_err();

    assert!(matches!(err, InventoryError::UnknownDepartment(id) if id == ghost));
}

#[tokio::test]
async fn test_department_products_and_delete_restriction() {
    let db = TestDatabase::new().await;
    let products = PgProductRepository::new(db.connection());
    let departments = PgDepartmentRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("department_products");

    let department = departments
        .create(Department::new(builder.name("department", "tools")))
        .await
        .unwrap();
    assert!(departments.department_exists(department.id).await.unwrap());

    let hammer = products
        .create(Product::new(builder.name("product", "hammer"), 9.99, Some(department.id)).unwrap())
        .await
        .unwrap();
    seeded_product(&products, builder.name("product", "loose"), 0).await;

    let assigned = products.list_by_department(department.id).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_uuid_eq(assigned[0].id, hammer.id, "assigned product");

    let err = DepartmentRepository::delete(&departments, department.id)
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::DepartmentInUse(_)));

    assert!(ProductRepository::delete(&products, hammer.id).await.unwrap());
    assert!(DepartmentRepository::delete(&departments, department.id).await.unwrap());
    assert!(!DepartmentRepository::delete(&departments, department.id).await.unwrap());
}

#[tokio::test]
async fn test_services_over_postgres() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("services_over_postgres");
    let products = ProductService::new(PgProductRepository::new(db.connection()));
    let departments = DepartmentService::new(
        PgDepartmentRepository::new(db.connection()),
        PgProductRepository::new(db.connection()),
    );

    let department = departments
        .create_new_department(builder.name("department", "svc"))
        .await
        .unwrap();
    let empty = departments.get_department_products(department.id).await.unwrap();
    assert!(empty.is_empty());

    let balance = products
        .add_product(CreateProduct {
            name: builder.name("product", "svc"),
            price: 10.0,
            department_id: Some(department.id),
        })
        .await
        .unwrap();
    assert_eq!(balance.balance, 0);

    products.buy_product(balance.id, 10).await.unwrap();
    let after_buy = products.buy_product(balance.id, 5).await.unwrap();
    assert_eq!(after_buy.balance, 15);

    let listed = departments.get_department_products(department.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].balance, 15);

    let renamed = departments
        .update_department(department.id, builder.name("department", "renamed"))
        .await
        .unwrap();
    assert_eq!(renamed.id, department.id);
    assert_eq!(
        departments.get_department_products(department.id).await.unwrap().len(),
        1
    );
}
