//! API route composition.

pub mod health;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use axum_helpers::{AuthState, JwtAuth, UserLookup, jwt_auth_middleware};
use domain_inventory::{
    DepartmentLookup, DepartmentRepository, DepartmentService, PgDepartmentRepository,
    PgProductRepository, ProductRepository, ProductService, ReferenceCheck, handlers,
};
use domain_users::{AuthService, PgUserRepository, UserRepository, auth_router};
use std::sync::Arc;

use crate::state::AppState;

/// Routes without the `/api/v1` prefix, which `create_router` adds.
pub fn routes(state: &AppState) -> Router {
    compose(
        PgProductRepository::new(state.db.clone()),
        PgDepartmentRepository::new(state.db.clone()),
        PgUserRepository::new(state.db.clone()),
        state.jwt.clone(),
    )
}

/// `/auth` is public. `/products` and `/departments` require a bearer token
/// whose user still exists.
pub fn compose<P, D, U>(products: P, departments: D, users: U, jwt: JwtAuth) -> Router
where
    P: ProductRepository + Clone + 'static,
    D: DepartmentRepository + DepartmentLookup + Clone + 'static,
    U: UserRepository + UserLookup + Clone + 'static,
{
    let auth = AuthState::new(jwt.clone(), Arc::new(users.clone()));

    let protected = Router::new()
        .nest(
            "/products",
            handlers::products_router(
                ProductService::new(products.clone()),
                ReferenceCheck::new(departments.clone()),
            ),
        )
        .nest(
            "/departments",
            handlers::departments_router(
                DepartmentService::new(departments.clone(), products),
                ReferenceCheck::new(departments),
            ),
        )
        .layer(from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .nest("/auth", auth_router(AuthService::new(users, jwt)))
        .merge(protected)
}

/// `GET /ready`, checking the database.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
