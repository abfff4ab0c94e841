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
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::failed;
use crate::department_service::DepartmentService;
use crate::models::{DepartmentDto, DepartmentName, ProductDto};
use crate::repository::{DepartmentLookup, DepartmentRepository, ProductRepository};
use crate::validation::ReferenceCheck;

pub const TAG: &str = "departments";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_departments,
        create_department,
        update_department,
        remove_department,
        get_department_products,
    ),
    components(
        schemas(DepartmentDto, DepartmentName, ProductDto),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Departments and their products")
    )
)]
pub struct DepartmentsApiDoc;

struct DepartmentHandlers<D, P, L>
where
    D: DepartmentRepository,
    P: ProductRepository,
    L: DepartmentLookup,
{
    service: DepartmentService<D, P>,
    references: ReferenceCheck<L>,
}

type DepartmentState<D, P, L> = State<Arc<DepartmentHandlers<D, P, L>>>;

/// Routes for `/departments`. Authentication is layered on by the caller.
pub fn departments_router<D, P, L>(
    service: DepartmentService<D, P>,
    references: ReferenceCheck<L>,
) -> Router
where
    D: DepartmentRepository + 'static,
    P: ProductRepository + 'static,
    L: DepartmentLookup + 'static,
{
    let state = Arc::new(DepartmentHandlers {
        service,
        references,
    });

    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/{id}",
            post(update_department).delete(remove_department),
        )
        .route("/{id}/products", get(get_department_products))
        .with_state(state)
}

/// List every department
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All departments", body = Vec<DepartmentDto>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_departments<D, P, L>(
    State(handlers): DepartmentState<D, P, L>,
) -> Result<Json<Vec<DepartmentDto>>, AppError>
where
    D: DepartmentRepository,
    P: ProductRepository,
    L: DepartmentLookup,
{
    let departments = handlers
        .service
        .list_departments()
        .await
        .map_err(failed("Listing departments failed"))?;
    Ok(Json(departments))
}

/// Create a department with a unique name
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = DepartmentName,
    responses(
        (status = 201, description = "Department created", body = DepartmentDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_department<D, P, L>(
    State(handlers): DepartmentState<D, P, L>,
    ValidatedJson(input): ValidatedJson<DepartmentName>,
) -> Result<impl IntoResponse, AppError>
where
    D: DepartmentRepository,
    P: ProductRepository,
    L: DepartmentLookup,
{
    handlers
        .references
        .department_name_free(&input.name)
        .await
        .map_err(failed("Create operation failed"))?;

    let department = handlers
        .service
        .create_new_department(input.name)
        .await
        .map_err(failed("Create operation failed"))?;

    Ok((StatusCode::CREATED, Json(department)))
}

/// Rename a department
#[utoipa::path(
    post,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = DepartmentName,
    responses(
        (status = 200, description = "Department renamed", body = DepartmentDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_department<D, P, L>(
    State(handlers): DepartmentState<D, P, L>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<DepartmentName>,
) -> Result<Json<DepartmentDto>, AppError>
where
    D: DepartmentRepository,
    P: ProductRepository,
    L: DepartmentLookup,
{
    handlers
        .references
        .department_name_free(&input.name)
        .await
        .map_err(failed("Update operation failed"))?;

    let department = handlers
        .service
        .update_department(id, input.name)
        .await
        .map_err(failed("Update operation failed"))?;
    Ok(Json(department))
}

/// Delete a department that has no products
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_department<D, P, L>(
    State(handlers): DepartmentState<D, P, L>,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError>
where
    D: DepartmentRepository,
    P: ProductRepository,
    L: DepartmentLookup,
{
    handlers
        .service
        .remove_department(id)
        .await
        .map_err(failed("Delete operation failed"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Products assigned to a department
#[utoipa::path(
    get,
    path = "/{id}/products",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Assigned products", body = Vec<ProductDto>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_department_products<D, P, L>(
    State(handlers): DepartmentState<D, P, L>,
    UuidPath(id): UuidPath,
) -> Result<Json<Vec<ProductDto>>, AppError>
where
    D: DepartmentRepository,
    P: ProductRepository,
    L: DepartmentLookup,
{
    let products = handlers
        .service
        .get_department_products(id)
        .await
        .map_err(failed("Listing department products failed"))?;
    Ok(Json(products))
}
