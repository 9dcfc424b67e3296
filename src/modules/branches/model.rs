use chrono::{DateTime, Utc};
use learnhub_core::{PaginationMeta, PaginationParams, serde::deserialize_optional_i64};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A physical location of a learning center.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub image: Option<String>,
    pub center_id: i64,
    pub region_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBranchDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 7, max = 32))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(url)]
    pub image: Option<String>,
    pub center_id: i64,
    pub region_id: i64,
}

/// A branch cannot move to another center.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBranchDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 7, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
    pub region_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BranchFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub center_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub region_id: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedBranchesResponse {
    pub data: Vec<Branch>,
    pub meta: PaginationMeta,
}
