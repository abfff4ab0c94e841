use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_departments::Departments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_uuid(Products::Id))
                    .col(string(Products::Name))
                    .col(double(Products::Price))
                    .col(integer(Products::Quantity).default(0))
                    .col(uuid_null(Products::DepartmentId))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    // Departments with products cannot be deleted
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_department_id")
                            .from(Products::Table, Products::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Stock and price invariants are enforced by the store itself
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE products
                    ADD CONSTRAINT products_quantity_non_negative CHECK (quantity >= 0),
                    ADD CONSTRAINT products_price_positive CHECK (price > 0)
                "#,
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_department_id")
                    .table(Products::Table)
                    .col(Products::DepartmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Price,
    Quantity,
    DepartmentId,
    CreatedAt,
    UpdatedAt,
}
