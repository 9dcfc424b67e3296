//! Learning center models.
//!
//! - [`LearningCenter`]: the stored row
//! - [`CenterSummary`]: a list entry with region name and engagement stats
//! - [`CenterDetails`]: a summary plus branches, subjects, and professions

use chrono::{DateTime, Utc};
use learnhub_core::{PaginationMeta, PaginationParams, serde::deserialize_optional_i64};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::branches::model::Branch;
use crate::modules::professions::model::Profession;
use crate::modules::subjects::model::Subject;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LearningCenter {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub description: Option<String>,
    /// Cover image URL
    pub image: Option<String>,
    pub region_id: i64,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CenterSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub center: LearningCenter,
    pub region_name: String,
    pub like_count: i64,
    pub comment_count: i64,
    /// Mean star rating, absent when the center has no comments
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CenterDetails {
    #[serde(flatten)]
    pub summary: CenterSummary,
    pub branches: Vec<Branch>,
    pub subjects: Vec<Subject>,
    pub professions: Vec<Profession>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCenterDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 7, max = 32))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub description: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
    pub region_id: i64,
    #[serde(default)]
    pub subject_ids: Vec<i64>,
    #[serde(default)]
    pub profession_ids: Vec<i64>,
}

/// Omitted fields are left unchanged. When `subject_ids` or
/// `profession_ids` is present it replaces the whole set.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCenterDto {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 7, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
    pub region_id: Option<i64>,
    pub subject_ids: Option<Vec<i64>>,
    pub profession_ids: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CenterFilterParams {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub region_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub profession_id: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCentersResponse {
    pub data: Vec<CenterSummary>,
    pub meta: PaginationMeta,
}
