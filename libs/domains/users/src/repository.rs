use async_trait::async_trait;
use axum_helpers::UserLookup;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` if the e-mail is taken.
    async fn create(&self, user: User) -> AuthResult<User>;

    async fn get_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> AuthResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AuthResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::AlreadyExists(user.email));
        }
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> AuthResult<bool> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}

#[async_trait]
impl UserLookup for InMemoryUserRepository {
    async fn user_exists(&self, user_id: Uuid) -> Result<bool, String> {
        self.get_by_id(user_id)
            .await
            .map(|user| user.is_some())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("clerk@example.com", "hash".into()))
            .await
            .unwrap();

        let err = repo
            .create(User::new("clerk@example.com", "other".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists(_)));
        assert!(repo.email_exists("clerk@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(User::new("clerk@example.com", "hash".into()))
            .await
            .unwrap();

        assert_eq!(repo.user_exists(user.id).await, Ok(true));
        assert_eq!(repo.user_exists(Uuid::now_v7()).await, Ok(false));
    }
}
