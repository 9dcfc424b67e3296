use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use learnhub_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateResourceCategoryDto, CreateResourceDto, PaginatedResourceCategoriesResponse,
    PaginatedResourcesResponse, Resource, ResourceCategory, ResourceCategoryFilterParams,
    ResourceFilterParams, UpdateResourceCategoryDto, UpdateResourceDto,
};
use super::service::{ResourceCategoryService, ResourceService};

fn invalid_query(e: QueryRejection) -> AppError {
    AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e))
}

#[utoipa::path(
    post,
    path = "/api/resource-categories",
    request_body = CreateResourceCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ResourceCategory),
        (status = 403, description = "Forbidden - staff only"),
        (status = 409, description = "Category already exists")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateResourceCategoryDto>,
) -> Result<(StatusCode, Json<ResourceCategory>), AppError> {
    let category = ResourceCategoryService::create_category(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/resource-categories",
    params(
        ("name" = Option<String>, Query, description = "Partial match on name"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses((status = 200, description = "Paginated categories", body = PaginatedResourceCategoriesResponse)),
    tag = "Resources"
)]
pub async fn get_categories(
    State(state): State<AppState>,
    filters: Result<Query<ResourceCategoryFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedResourceCategoriesResponse>, AppError> {
    let Query(filters) = filters.map_err(invalid_query)?;
    Ok(Json(
        ResourceCategoryService::get_categories(&state.db, filters).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/resource-categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ResourceCategory),
        (status = 404, description = "Category not found")
    ),
    tag = "Resources"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ResourceCategory>, AppError> {
    Ok(Json(
        ResourceCategoryService::get_category(&state.db, id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/resource-categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = UpdateResourceCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ResourceCategory),
        (status = 404, description = "Category not found")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateResourceCategoryDto>,
) -> Result<Json<ResourceCategory>, AppError> {
    Ok(Json(
        ResourceCategoryService::update_category(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/resource-categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category and its resources deleted"),
        (status = 404, description = "Category not found")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ResourceCategoryService::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource published", body = Resource),
        (status = 400, description = "Unknown category"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
pub async fn create_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<Resource>), AppError> {
    let resource = ResourceService::create_resource(&state.db, auth_user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[utoipa::path(
    get,
    path = "/api/resources",
    params(
        ("category_id" = Option<i64>, Query, description = "Filter by category"),
        ("name" = Option<String>, Query, description = "Partial match on name"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses((status = 200, description = "Paginated resources", body = PaginatedResourcesResponse)),
    tag = "Resources"
)]
pub async fn get_resources(
    State(state): State<AppState>,
    filters: Result<Query<ResourceFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedResourcesResponse>, AppError> {
    let Query(filters) = filters.map_err(invalid_query)?;
    Ok(Json(ResourceService::get_resources(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/resources/{id}",
    params(("id" = i64, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource", body = Resource),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources"
)]
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Resource>, AppError> {
    Ok(Json(ResourceService::get_resource(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/resources/{id}",
    params(("id" = i64, Path, description = "Resource ID")),
    request_body = UpdateResourceDto,
    responses(
        (status = 200, description = "Resource updated", body = Resource),
        (status = 403, description = "Not the publisher"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
pub async fn update_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateResourceDto>,
) -> Result<Json<Resource>, AppError> {
    Ok(Json(
        ResourceService::update_resource(&state.db, &auth_user, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/resources/{id}",
    params(("id" = i64, Path, description = "Resource ID")),
    responses(
        (status = 204, description = "Resource deleted"),
        (status = 403, description = "Not the publisher"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
pub async fn delete_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ResourceService::delete_resource(&state.db, &auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
