use axum::http::{HeaderValue, Method, header, header::InvalidHeaderValue};
use core_config::CorsConfig;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer for the configured origins.
///
/// [`CorsConfig::AnyOrigin`] mirrors the caller's `Origin` back, which keeps
/// credentialed requests working. Requests without an `Origin` header are not
/// affected by CORS at all.
pub fn create_cors_layer(config: &CorsConfig) -> Result<CorsLayer, InvalidHeaderValue> {
    let allow_origin = match config {
        CorsConfig::AnyOrigin => AllowOrigin::mirror_request(),
        CorsConfig::Origins(origins) => AllowOrigin::list(
            origins
                .iter()
                .map(|origin| origin.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn preflight(config: CorsConfig, origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(create_cors_layer(&config).unwrap());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/")
                    .header("origin", origin)
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.headers().get("access-control-allow-origin").cloned()
    }

    #[tokio::test]
    async fn test_any_origin_is_mirrored() {
        let allowed = preflight(CorsConfig::AnyOrigin, "http://localhost:5173").await;
        assert_eq!(allowed.unwrap(), "http://localhost:5173");
    }

    #[tokio::test]
    async fn test_listed_origin_is_allowed_and_others_are_not() {
        let config = CorsConfig::Origins(vec!["https://shop.example.com".to_string()]);

        let allowed = preflight(config.clone(), "https://shop.example.com").await;
        assert_eq!(allowed.unwrap(), "https://shop.example.com");

        assert!(preflight(config, "https://evil.example.com").await.is_none());
    }
}
