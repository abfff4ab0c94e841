use axum_helpers::JwtConfig;
use core_config::{AppInfo, CorsConfig, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config sections.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    /// `RUN_MIGRATIONS`, on unless set to `false`.
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=3001
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let jwt = JwtConfig::from_env()?; // JWT_SECRET is required, 32+ chars
        let cors = CorsConfig::from_env()?;
        let run_migrations = env_parse_or("RUN_MIGRATIONS", true)?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            jwt,
            cors,
            run_migrations,
        })
    }
}
