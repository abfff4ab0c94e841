use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::failed;
use crate::models::{
    AssignDepartment, CreateProduct, DepartmentAssignment, ProductDto, StockBalance, StockChange,
    UpdateProduct,
};
use crate::product_service::ProductService;
use crate::repository::{DepartmentLookup, ProductRepository};
use crate::validation::ReferenceCheck;

pub const TAG: &str = "products";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_inventory,
        add_product,
        get_product_info,
        update_product,
        remove_product,
        buy_product,
        sell_product,
        assign_department,
    ),
    components(
        schemas(
            ProductDto,
            StockBalance,
            DepartmentAssignment,
            CreateProduct,
            UpdateProduct,
            StockChange,
            AssignDepartment
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalogue and stock movements")
    )
)]
pub struct ProductsApiDoc;

struct ProductHandlers<R: ProductRepository, L: DepartmentLookup> {
    service: ProductService<R>,
    references: ReferenceCheck<L>,
}

type ProductState<R, L> = State<Arc<ProductHandlers<R, L>>>;

/// Routes for `/products`. Authentication is layered on by the caller.
pub fn products_router<R, L>(service: ProductService<R>, references: ReferenceCheck<L>) -> Router
where
    R: ProductRepository + 'static,
    L: DepartmentLookup + 'static,
{
    let state = Arc::new(ProductHandlers {
        service,
        references,
    });

    Router::new()
        .route("/", get(list_inventory).post(add_product))
        .route(
            "/{id}",
            get(get_product_info)
                .put(update_product)
                .delete(remove_product),
        )
        .route("/{id}/buy", post(buy_product))
        .route("/{id}/sell", post(sell_product))
        .route("/{id}/assign-department", post(assign_department))
        .with_state(state)
}

/// List every product with its stock balance
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All products", body = Vec<ProductDto>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_inventory<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
) -> Result<Json<Vec<ProductDto>>, AppError> {
    let products = handlers
        .service
        .list_inventory()
        .await
        .map_err(failed("Listing products failed"))?;
    Ok(Json(products))
}

/// Register a product with an empty stock
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = StockBalance),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_product<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> Result<impl IntoResponse, AppError> {
    handlers
        .references
        .optional_department_exists(input.department_id)
        .await
        .map_err(failed("Create operation failed"))?;

    let balance = handlers
        .service
        .add_product(input)
        .await
        .map_err(failed("Create operation failed"))?;

    Ok((StatusCode::CREATED, Json(balance)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_info<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
    UuidPath(id): UuidPath,
) -> Result<Json<ProductDto>, AppError> {
    let product = handlers
        .service
        .get_product_info(id)
        .await
        .map_err(failed("Product lookup failed"))?;
    Ok(Json(product))
}

/// Update name, price or department
///
/// Absent fields are kept; `departmentId: null` clears the department.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
    UuidPath(id): UuidPath,
    ValidatedJson(changes): ValidatedJson<UpdateProduct>,
) -> Result<Json<ProductDto>, AppError> {
    handlers
        .references
        .optional_department_exists(changes.target_department())
        .await
        .map_err(failed("Update operation failed"))?;

    let product = handlers
        .service
        .update_product(id, changes)
        .await
        .map_err(failed("Update operation failed"))?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_product<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    handlers
        .service
        .remove_product(id)
        .await
        .map_err(failed("Delete operation failed"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add units to the stock
#[utoipa::path(
    post,
    path = "/{id}/buy",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = StockChange,
    responses(
        (status = 200, description = "New balance", body = StockBalance),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn buy_product<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
    UuidPath(id): UuidPath,
    ValidatedJson(change): ValidatedJson<StockChange>,
) -> Result<Json<StockBalance>, AppError> {
    let balance = handlers
        .service
        .buy_product(id, change.amount)
        .await
        .map_err(failed("Buy operation failed"))?;
    Ok(Json(balance))
}

/// Remove units from the stock
#[utoipa::path(
    post,
    path = "/{id}/sell",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = StockChange,
    responses(
        (status = 200, description = "New balance", body = StockBalance),
        (status = 400, description = "Invalid amount or insufficient stock", body = axum_helpers::ErrorResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn sell_product<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
    UuidPath(id): UuidPath,
    ValidatedJson(change): ValidatedJson<StockChange>,
) -> Result<Json<StockBalance>, AppError> {
    let balance = handlers
        .service
        .sell_product(id, change.amount)
        .await
        .map_err(failed("Sell operation failed"))?;
    Ok(Json(balance))
}

/// Move a product into a department
#[utoipa::path(
    post,
    path = "/{id}/assign-department",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AssignDepartment,
    responses(
        (status = 200, description = "Department assigned", body = DepartmentAssignment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn assign_department<R: ProductRepository, L: DepartmentLookup>(
    State(handlers): ProductState<R, L>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AssignDepartment>,
) -> Result<Json<DepartmentAssignment>, AppError> {
    handlers
        .references
        .department_exists(input.department_id)
        .await
        .map_err(failed("Department assignment failed"))?;

    let assignment = handlers
        .service
        .assign_department_to_product(id, input.department_id)
        .await
        .map_err(failed("Department assignment failed"))?;
    Ok(Json(assignment))
}
