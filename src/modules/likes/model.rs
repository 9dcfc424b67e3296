use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub center_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct CreateLikeDto {
    pub center_id: i64,
}

/// A center the caller liked.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LikedCenter {
    pub center_id: i64,
    pub name: String,
    pub image: Option<String>,
    pub address: String,
    pub liked_at: DateTime<Utc>,
}
