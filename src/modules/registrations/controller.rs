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
    CreateRegistrationDto, PaginatedRegistrationsResponse, Registration, RegistrationFilterParams,
    RegistrationStatus, UpdateRegistrationStatusDto,
};
use super::service::RegistrationService;

#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationDto,
    responses(
        (status = 201, description = "Registration created", body = Registration),
        (status = 400, description = "Unknown center or branch outside the center"),
        (status = 422, description = "Visit date in the past")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn create_registration(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateRegistrationDto>,
) -> Result<(StatusCode, Json<Registration>), AppError> {
    let registration =
        RegistrationService::create_registration(&state.db, auth_user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

#[utoipa::path(
    get,
    path = "/api/registrations/me",
    responses((status = 200, description = "Caller's registrations", body = Vec<Registration>)),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn get_my_registrations(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Registration>>, AppError> {
    let registrations =
        RegistrationService::get_user_registrations(&state.db, auth_user.id()).await?;
    Ok(Json(registrations))
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    params(
        ("center_id" = Option<i64>, Query, description = "Filter by learning center"),
        ("status" = Option<RegistrationStatus>, Query, description = "Filter by status"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses(
        (status = 200, description = "Registrations visible to the caller", body = PaginatedRegistrationsResponse),
        (status = 403, description = "Forbidden - CEO or staff only")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn get_registrations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    filters: Result<Query<RegistrationFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedRegistrationsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    let registrations =
        RegistrationService::get_registrations(&state.db, &auth_user, filters).await?;
    Ok(Json(registrations))
}

#[utoipa::path(
    patch,
    path = "/api/registrations/{id}/status",
    params(("id" = i64, Path, description = "Registration ID")),
    request_body = UpdateRegistrationStatusDto,
    responses(
        (status = 200, description = "Status changed", body = Registration),
        (status = 403, description = "Not a manager of this center"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn update_registration_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateRegistrationStatusDto>,
) -> Result<Json<Registration>, AppError> {
    let registration =
        RegistrationService::update_status(&state.db, &auth_user, id, dto.status).await?;
    Ok(Json(registration))
}

#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    params(("id" = i64, Path, description = "Registration ID")),
    responses(
        (status = 204, description = "Registration deleted"),
        (status = 403, description = "Not the registrant"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn delete_registration(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    RegistrationService::delete_registration(&state.db, &auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
