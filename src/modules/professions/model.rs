use chrono::{DateTime, Utc};
use learnhub_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A career track a learning center prepares students for (e.g. "Web developer").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profession {
    pub id: i64,
    pub name: String,
    /// Image URL
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfessionDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(url)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfessionDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfessionFilterParams {
    pub name: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedProfessionsResponse {
    pub data: Vec<Profession>,
    pub meta: PaginationMeta,
}
