//! Readiness backed by a real database round trip.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// `{"status":"ready","database":"connected"}`, or 503 when the pool is down.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use axum_helpers::JwtAuth;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn state(db: database::postgres::DatabaseConnection) -> AppState {
        let config = temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/inventory")),
                ("JWT_SECRET", Some("readiness-test-secret-of-32-chars!!")),
            ],
            Config::from_env,
        )
        .unwrap();
        let jwt = JwtAuth::new(&config.jwt);
        AppState { config, db, jwt }
    }

    async fn ready(db: database::postgres::DatabaseConnection) -> StatusCode {
        let app = Router::new()
            .route("/ready", get(ready_handler))
            .with_state(state(db));
        app.oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_ready_when_database_answers() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "?column?",
                sea_orm::Value::Int(Some(1)),
            )])]])
            .into_connection();

        assert_eq!(ready(db).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_when_database_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".to_string())])
            .into_connection();

        assert_eq!(ready(db).await, StatusCode::SERVICE_UNAVAILABLE);
    }
}
