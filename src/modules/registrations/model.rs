use chrono::{DateTime, Utc};
use learnhub_core::{PaginationMeta, PaginationParams, serde::deserialize_optional_i64};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "registration_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

/// A user's request to visit a learning center (optionally a specific branch).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub center_id: i64,
    pub branch_id: Option<i64>,
    pub visit_date: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationDto {
    pub center_id: i64,
    pub branch_id: Option<i64>,
    pub visit_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
pub struct UpdateRegistrationStatusDto {
    pub status: RegistrationStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub center_id: Option<i64>,
    pub status: Option<RegistrationStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedRegistrationsResponse {
    pub data: Vec<Registration>,
    pub meta: PaginationMeta,
}
