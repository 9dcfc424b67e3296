use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use learnhub_core::AppError;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CenterDetails, CenterFilterParams, CreateCenterDto, PaginatedCentersResponse, UpdateCenterDto,
};
use super::service::CenterService;

/// Create a learning center owned by the caller
#[utoipa::path(
    post,
    path = "/api/centers",
    request_body = CreateCenterDto,
    responses(
        (status = 201, description = "Learning center created", body = CenterDetails),
        (status = 400, description = "Unknown region, subject, or profession"),
        (status = 403, description = "Forbidden - CEO or staff only"),
        (status = 409, description = "Name already taken")
    ),
    tag = "Learning Centers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto), fields(user.id = %auth_user.id()))]
pub async fn create_center(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCenterDto>,
) -> Result<(StatusCode, Json<CenterDetails>), AppError> {
    let center = CenterService::create_center(&state.db, auth_user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(center)))
}

/// List learning centers with like, comment, and rating stats
#[utoipa::path(
    get,
    path = "/api/centers",
    params(
        ("name" = Option<String>, Query, description = "Partial match on name"),
        ("region_id" = Option<i64>, Query, description = "Filter by region"),
        ("subject_id" = Option<i64>, Query, description = "Only centers teaching this subject"),
        ("profession_id" = Option<i64>, Query, description = "Only centers offering this profession"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses(
        (status = 200, description = "Paginated learning centers", body = PaginatedCentersResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "Learning Centers"
)]
pub async fn get_centers(
    State(state): State<AppState>,
    filters: Result<Query<CenterFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedCentersResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(CenterService::get_centers(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/centers/{id}",
    params(("id" = i64, Path, description = "Learning center ID")),
    responses(
        (status = 200, description = "Learning center with branches, subjects, and professions", body = CenterDetails),
        (status = 404, description = "Learning center not found")
    ),
    tag = "Learning Centers"
)]
pub async fn get_center(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CenterDetails>, AppError> {
    Ok(Json(CenterService::get_center(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/centers/{id}",
    params(("id" = i64, Path, description = "Learning center ID")),
    request_body = UpdateCenterDto,
    responses(
        (status = 200, description = "Learning center updated", body = CenterDetails),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Learning center not found")
    ),
    tag = "Learning Centers",
    security(("bearer_auth" = []))
)]
pub async fn update_center(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCenterDto>,
) -> Result<Json<CenterDetails>, AppError> {
    let center = CenterService::update_center(&state.db, &auth_user, id, dto).await?;
    Ok(Json(center))
}

#[utoipa::path(
    delete,
    path = "/api/centers/{id}",
    params(("id" = i64, Path, description = "Learning center ID")),
    responses(
        (status = 204, description = "Learning center deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Learning center not found")
    ),
    tag = "Learning Centers",
    security(("bearer_auth" = []))
)]
pub async fn delete_center(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    CenterService::delete_center(&state.db, &auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
