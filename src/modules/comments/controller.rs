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
    Comment, CommentFilterParams, CreateCommentDto, PaginatedCommentsResponse, UpdateCommentDto,
};
use super::service::CommentService;

#[utoipa::path(
    get,
    path = "/api/comments",
    params(
        ("center_id" = Option<i64>, Query, description = "Filter by learning center"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)")
    ),
    responses((status = 200, description = "Paginated comments with author names", body = PaginatedCommentsResponse)),
    tag = "Comments"
)]
pub async fn get_comments(
    State(state): State<AppState>,
    filters: Result<Query<CommentFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedCommentsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(CommentService::get_comments(&state.db, filters).await?))
}

#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Unknown learning center"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Star outside 1..=5")
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = CommentService::create_comment(&state.db, auth_user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    patch,
    path = "/api/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = UpdateCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
pub async fn update_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCommentDto>,
) -> Result<Json<Comment>, AppError> {
    let comment = CommentService::update_comment(&state.db, &auth_user, id, dto).await?;
    Ok(Json(comment))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found")
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    CommentService::delete_comment(&state.db, &auth_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
