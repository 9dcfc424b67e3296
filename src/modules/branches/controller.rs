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
    Branch, BranchFilterParams, CreateBranchDto, PaginatedBranchesResponse, UpdateBranchDto,
};
use super::service::BranchService;

#[utoipa::path(
    post,
    path = "/api/branches",
    request_body = CreateBranchDto,
    responses(
        (status = 201, description = "Branch created", body = Branch),
        (status = 400, description = "Unknown region"),
        (status = 403, description = "Not a manager of this center"),
        (status = 404, description = "Learning center not found")
    ),
    tag = "Branches",
    security(("bearer_auth" = []))
)]
pub async fn create_branch(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateBranchDto>,
) -> Result<(StatusCode, Json<Branch>), AppError> {
    let branch = BranchService::create_branch(&state.db, &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

#[utoipa::path(
    get,
    path = "/api/branches",
    params(
        ("center_id" = Option<i64>, Query, description = "Filter by learning center"),
        ("region_id" = Option<i64>, Query, description = "Filter by region"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses((status = 200, description = "Paginated branches", body = PaginatedBranchesResponse)),
    tag = "Branches"
)]
pub async fn get_branches(
    State(state): State<AppState>,
    filters: Result<Query<BranchFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedBranchesResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(BranchService::get_branches(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/branches/{id}",
    params(("id" = i64, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "Branch", body = Branch),
        (status = 404, description = "Branch not found")
    ),
    tag = "Branches"
)]
pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Branch>, AppError> {
    Ok(Json(BranchService::get_branch(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/branches/{id}",
    params(("id" = i64, Path, description = "Branch ID")),
    request_body = UpdateBranchDto,
    responses(
        (status = 200, description = "Branch updated", body = Branch),
        (status = 403, description = "Not a manager of this center"),
        (status = 404, description = "Branch not found")
    ),
    tag = "Branches",
    security(("bearer_auth" = []))
)]
pub async fn update_branch(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateBranchDto>,
) -> Result<Json<Branch>, AppError> {
    let branch = BranchService::update_branch(&state.db, &auth_user, id, dto).await?;
    Ok(Json(branch))
}

#[utoipa::path(
    delete,
    path = "/api/branches/{id}",
    params(("id" = i64, Path, description = "Branch ID")),
    responses(
        (status = 204, description = "Branch deleted"),
        (status = 403, description = "Not a manager of this center"),
        (status = 404, description = "Branch not found")
    ),
    tag = "Branches",
    security(("bearer_auth" = []))
)]
pub async fn delete_branch(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    BranchService::delete_branch(&state.db, &auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
