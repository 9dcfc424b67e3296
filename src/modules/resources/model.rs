use chrono::{DateTime, Utc};
use learnhub_core::{PaginationMeta, PaginationParams, serde::deserialize_optional_i64};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResourceCategory {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResourceCategoryDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(url)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceCategoryDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
}

/// A shared learning resource (book, video, course link) published by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Media URL (video, document, ...)
    pub media: Option<String>,
    pub image: Option<String>,
    pub category_id: i64,
    /// Publisher
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResourceDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(url)]
    pub media: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
    pub category_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(url)]
    pub media: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceCategoryFilterParams {
    pub name: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub category_id: Option<i64>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResourceCategoriesResponse {
    pub data: Vec<ResourceCategory>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResourcesResponse {
    pub data: Vec<Resource>,
    pub meta: PaginationMeta,
}
