use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A registered account. Never changes after registration.
#[derive(Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `password_hash` must already be an Argon2 PHC string.
    pub fn new(email: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Body of both `/auth/register` and `/auth/login`.
#[derive(Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(
        length(min = 1, message = "must not be empty."),
        email(message = "not a valid e-mail")
    )]
    #[schema(example = "clerk@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "must have at least 6 characters"))]
    #[schema(example = "s3cret!")]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// HS256 JWT, valid for one hour
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_credentials_rules() {
        assert!(credentials("clerk@example.com", "123456").validate().is_ok());

        let errors = credentials("not-an-email", "12345").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_debug_never_prints_secrets() {
        let printed = format!("{:?}", credentials("clerk@example.com", "hunter22"));
        assert!(!printed.contains("hunter22"));

        let user = User::new("clerk@example.com", "$argon2id$v=19$secret".to_string());
        assert!(!format!("{:?}", user).contains("secret"));
    }
}
