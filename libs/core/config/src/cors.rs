use crate::{env_or_default, ConfigError, FromEnv};

/// Allowed browser origins, read from `ALLOWED_CORS_ORIGINS`.
///
/// The variable is a comma-separated list. An unset variable, an empty one or
/// a lone `*` allow any origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsConfig {
    AnyOrigin,
    Origins(Vec<String>),
}

impl CorsConfig {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            return Ok(CorsConfig::AnyOrigin);
        }

        if let Some(bad) = origins
            .iter()
            .find(|origin| !(origin.starts_with("http://") || origin.starts_with("https://")))
        {
            return Err(ConfigError::InvalidValue {
                key: "ALLOWED_CORS_ORIGINS".to_string(),
                details: format!("origin '{}' must start with http:// or https://", bad),
            });
        }

        Ok(CorsConfig::Origins(origins))
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig::AnyOrigin
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::parse(&env_or_default("ALLOWED_CORS_ORIGINS", "*"))
    }
}
