use axum_helpers::JwtAuth;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::{Credentials, User};
use crate::password::{hash_password, verify_password};
use crate::repository::UserRepository;

/// A freshly issued token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user_id: Uuid,
    pub token: String,
}

/// Registration and login
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            jwt: self.jwt.clone(),
        }
    }
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Create an account and sign its first token.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn register_user(&self, credentials: Credentials) -> AuthResult<SignedIn> {
        if self.repository.email_exists(&credentials.email).await? {
            return Err(AuthError::AlreadyExists(credentials.email));
        }

        let password_hash = hash_password(credentials.password).await?;
        let user = self
            .repository
            .create(User::new(credentials.email, password_hash))
            .await?;

        let token = self.jwt.issue_token(user.id)?;
        Ok(SignedIn {
            user_id: user.id,
            token,
        })
    }

    /// Exchange e-mail and password for a token.
    ///
    /// Unknown e-mail and wrong password both fail with `InvalidCredentials`.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn check_credentials(&self, credentials: Credentials) -> AuthResult<SignedIn> {
        let Some(user) = self.repository.get_by_email(&credentials.email).await? else {
            tracing::debug!("Login for unknown e-mail");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(credentials.password, user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.issue_token(user.id)?;
        Ok(SignedIn {
            user_id: user.id,
            token,
        })
    }
}
