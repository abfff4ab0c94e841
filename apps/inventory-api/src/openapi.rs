//! OpenAPI document for the whole service.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

/// Declares the `bearer_auth` scheme the protected operations refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Products, departments and stock movements behind bearer-token authentication"
    ),
    components(schemas(axum_helpers::ErrorResponse)),
    modifiers(&BearerAuth),
    nest(
        (path = "/api/v1/auth", api = domain_users::AuthApiDoc),
        (path = "/api/v1/products", api = domain_inventory::handlers::ProductsApiDoc),
        (path = "/api/v1/departments", api = domain_inventory::handlers::DepartmentsApiDoc)
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "products", description = "Product catalogue and stock"),
        (name = "departments", description = "Department management")
    )
)]
pub struct ApiDoc;
