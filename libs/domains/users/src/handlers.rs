use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, ValidatedJson,
    errors::responses::{BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse},
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::AuthError;
use crate::models::{Credentials, TokenResponse};
use crate::repository::UserRepository;
use crate::service::AuthService;

pub const TAG: &str = "auth";

#[derive(OpenApi)]
#[openapi(
    paths(register, login),
    components(
        schemas(Credentials, TokenResponse),
        responses(BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Registration and login")
    )
)]
pub struct AuthApiDoc;

/// Public routes for `/auth`.
pub fn auth_router<R: UserRepository + 'static>(service: AuthService<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(Arc::new(service))
}

/// The e-mail goes into the audit trail; the password never does.
fn audit(
    headers: &HeaderMap,
    action: &str,
    outcome: AuditOutcome,
    user_id: Option<Uuid>,
    email: &str,
) {
    AuditEvent::new(user_id.map(|id| id.to_string()), action, outcome)
        .with_ip(extract_ip_from_headers(headers))
        .with_user_agent(extract_user_agent(headers))
        .with_details(json!({ "email": email }))
        .log();
}

/// Create an account and return its first token
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<AuthService<R>>>,
    headers: HeaderMap,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let email = credentials.email.clone();

    match service.register_user(credentials).await {
        Ok(signed_in) => {
            audit(
                &headers,
                "user.register",
                AuditOutcome::Success,
                Some(signed_in.user_id),
                &email,
            );

            Ok((
                StatusCode::CREATED,
                Json(TokenResponse {
                    token: signed_in.token,
                }),
            ))
        }
        Err(err) => {
            audit(&headers, "user.register", AuditOutcome::Failure, None, &email);
            Err(AppError::from(err).context("Registration failed"))
        }
    }
}

/// Exchange e-mail and password for a token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Invalid body or credentials", body = axum_helpers::ErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<AuthService<R>>>,
    headers: HeaderMap,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = credentials.email.clone();

    match service.check_credentials(credentials).await {
        Ok(signed_in) => {
            audit(
                &headers,
                "user.login",
                AuditOutcome::Success,
                Some(signed_in.user_id),
                &email,
            );

            Ok(Json(TokenResponse {
                token: signed_in.token,
            }))
        }
        Err(err) => {
            let outcome = match &err {
                AuthError::InvalidCredentials => AuditOutcome::Denied,
                _ => AuditOutcome::Failure,
            };
            audit(&headers, "user.login", outcome, None, &email);
            Err(AppError::from(err).context("Login failed"))
        }
    }
}
