use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use learnhub_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::model::{CreateLikeDto, Like, LikedCenter};
use super::service::LikeService;

#[utoipa::path(
    post,
    path = "/api/likes",
    request_body = CreateLikeDto,
    responses(
        (status = 201, description = "Center liked", body = Like),
        (status = 400, description = "Unknown learning center"),
        (status = 409, description = "Already liked")
    ),
    tag = "Likes",
    security(("bearer_auth" = []))
)]
pub async fn like_center(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<CreateLikeDto>,
) -> Result<(StatusCode, Json<Like>), AppError> {
    let like = LikeService::like_center(&state.db, auth_user.id(), dto.center_id).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

#[utoipa::path(
    delete,
    path = "/api/likes/{center_id}",
    params(("center_id" = i64, Path, description = "Learning center ID")),
    responses(
        (status = 204, description = "Like removed"),
        (status = 404, description = "Like not found")
    ),
    tag = "Likes",
    security(("bearer_auth" = []))
)]
pub async fn unlike_center(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(center_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    LikeService::unlike_center(&state.db, auth_user.id(), center_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/likes/me",
    responses((status = 200, description = "Centers liked by the caller", body = Vec<LikedCenter>)),
    tag = "Likes",
    security(("bearer_auth" = []))
)]
pub async fn get_my_likes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<LikedCenter>>, AppError> {
    Ok(Json(LikeService::get_user_likes(&state.db, auth_user.id()).await?))
}
