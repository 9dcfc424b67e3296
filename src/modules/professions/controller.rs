use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use learnhub_core::AppError;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateProfessionDto, PaginatedProfessionsResponse, Profession, ProfessionFilterParams, UpdateProfessionDto,
};
use super::service::ProfessionService;

#[utoipa::path(
    post,
    path = "/api/professions",
    request_body = CreateProfessionDto,
    responses(
        (status = 201, description = "Profession created", body = Profession),
        (status = 403, description = "Forbidden - staff only"),
        (status = 409, description = "Profession already exists")
    ),
    tag = "Professions",
    security(("bearer_auth" = []))
)]
pub async fn create_profession(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateProfessionDto>,
) -> Result<(StatusCode, Json<Profession>), AppError> {
    let profession = ProfessionService::create_profession(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(profession)))
}

#[utoipa::path(
    get,
    path = "/api/professions",
    params(
        ("name" = Option<String>, Query, description = "Partial match on name"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses((status = 200, description = "Paginated professions", body = PaginatedProfessionsResponse)),
    tag = "Professions"
)]
pub async fn get_professions(
    State(state): State<AppState>,
    filters: Result<Query<ProfessionFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedProfessionsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(ProfessionService::get_professions(&state.db, filters).await?))
}

#[utoipa::path(
    get,
    path = "/api/professions/{id}",
    params(("id" = i64, Path, description = "Profession ID")),
    responses(
        (status = 200, description = "Profession", body = Profession),
        (status = 404, description = "Profession not found")
    ),
    tag = "Professions"
)]
pub async fn get_profession(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Profession>, AppError> {
    Ok(Json(ProfessionService::get_profession(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/professions/{id}",
    params(("id" = i64, Path, description = "Profession ID")),
    request_body = UpdateProfessionDto,
    responses(
        (status = 200, description = "Profession updated", body = Profession),
        (status = 404, description = "Profession not found"),
        (status = 409, description = "Profession already exists")
    ),
    tag = "Professions",
    security(("bearer_auth" = []))
)]
pub async fn update_profession(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateProfessionDto>,
) -> Result<Json<Profession>, AppError> {
    Ok(Json(ProfessionService::update_profession(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/professions/{id}",
    params(("id" = i64, Path, description = "Profession ID")),
    responses(
        (status = 204, description = "Profession deleted"),
        (status = 404, description = "Profession not found")
    ),
    tag = "Professions",
    security(("bearer_auth" = []))
)]
pub async fn delete_profession(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ProfessionService::delete_profession(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
