use chrono::{DateTime, Utc};
use learnhub_core::{PaginationMeta, PaginationParams, serde::deserialize_optional_i64};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    /// Rating from 1 to 5
    pub star: i16,
    pub user_id: i64,
    pub center_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub author_first_name: String,
    pub author_last_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[validate(range(min = 1, max = 5, message = "star must be between 1 and 5"))]
    pub star: i16,
    pub center_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentDto {
    #[validate(length(min = 1, max = 2000))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 5, message = "star must be between 1 and 5"))]
    pub star: Option<i16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub center_id: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCommentsResponse {
    pub data: Vec<CommentWithAuthor>,
    pub meta: PaginationMeta,
}
