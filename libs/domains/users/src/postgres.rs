use async_trait::async_trait;
use axum_helpers::UserLookup;
use sea_orm::{DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use crate::entity;
use crate::error::{AuthError, AuthResult};
use crate::models::User;
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    db: sea_orm::DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: sea_orm::DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct ExistsResult {
    exists: bool,
}

fn database_error(e: sea_orm::DbErr) -> AuthError {
    AuthError::Internal(format!("Database error: {}", e))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> AuthResult<User> {
        let sql = r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, created_at
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.email.clone().into(),
                user.password_hash.clone().into(),
                user.created_at.into(),
            ],
        );

        let row = entity::Model::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
                    AuthError::AlreadyExists(user.email.clone())
                } else {
                    database_error(e)
                }
            })?
            .ok_or_else(|| AuthError::Internal("Failed to create user".to_string()))?;

        tracing::info!(user_id = %row.id, "Created user");
        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let sql = "SELECT id, email, password_hash, created_at FROM users WHERE id = $1";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = entity::Model::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(database_error)?;

        Ok(row.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let sql = "SELECT id, email, password_hash, created_at FROM users WHERE email = $1";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [email.into()]);

        let row = entity::Model::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(database_error)?;

        Ok(row.map(User::from))
    }

    async fn email_exists(&self, email: &str) -> AuthResult<bool> {
        let sql = "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) AS exists";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [email.into()]);

        let result = ExistsResult::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(database_error)?;

        Ok(result.is_some_and(|r| r.exists))
    }
}

#[async_trait]
impl UserLookup for PgUserRepository {
    async fn user_exists(&self, user_id: Uuid) -> Result<bool, String> {
        let sql = "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1) AS exists";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [user_id.into()]);

        let result = ExistsResult::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        Ok(result.is_some_and(|r| r.exists))
    }
}
