use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use learnhub_core::AppError;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateRegionDto, PaginatedRegionsResponse, Region, RegionFilterParams, UpdateRegionDto,
};
use super::service::RegionService;

#[utoipa::path(
    post,
    path = "/api/regions",
    request_body = CreateRegionDto,
    responses(
        (status = 201, description = "Region created", body = Region),
        (status = 403, description = "Forbidden - staff only"),
        (status = 409, description = "Region already exists")
    ),
    tag = "Regions",
    security(("bearer_auth" = []))
)]
pub async fn create_region(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRegionDto>,
) -> Result<(StatusCode, Json<Region>), AppError> {
    let region = RegionService::create_region(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

#[utoipa::path(
    get,
    path = "/api/regions",
    params(
        ("name" = Option<String>, Query, description = "Partial match on name"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses((status = 200, description = "Paginated regions", body = PaginatedRegionsResponse)),
    tag = "Regions"
)]
pub async fn get_regions(
    State(state): State<AppState>,
    filters: Result<Query<RegionFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedRegionsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(RegionService::get_regions(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/regions/{id}",
    params(("id" = i64, Path, description = "Region ID")),
    responses(
        (status = 200, description = "Region", body = Region),
        (status = 404, description = "Region not found")
    ),
    tag = "Regions"
)]
pub async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Region>, AppError> {
    Ok(Json(RegionService::get_region(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/regions/{id}",
    params(("id" = i64, Path, description = "Region ID")),
    request_body = UpdateRegionDto,
    responses(
        (status = 200, description = "Region updated", body = Region),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Region already exists")
    ),
    tag = "Regions",
    security(("bearer_auth" = []))
)]
pub async fn update_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateRegionDto>,
) -> Result<Json<Region>, AppError> {
    Ok(Json(RegionService::update_region(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/regions/{id}",
    params(("id" = i64, Path, description = "Region ID")),
    responses(
        (status = 204, description = "Region deleted"),
        (status = 404, description = "Region not found"),
        (status = 409, description = "Region still in use")
    ),
    tag = "Regions",
    security(("bearer_auth" = []))
)]
pub async fn delete_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    RegionService::delete_region(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
