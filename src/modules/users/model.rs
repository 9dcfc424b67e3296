//! User entities and DTOs.
//!
//! [`User`] is the public shape returned by the API and never carries the
//! password hash; [`UserCredentials`] is read only during login and password
//! changes.

use chrono::{DateTime, Utc};
use learnhub_auth::Role;
use learnhub_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const USER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, role, image, created_at, updated_at";

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    /// Avatar URL
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub role: Role,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 7, max = 32))]
    pub phone: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, message = "new_password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Deserialize, Debug, Clone, Copy, ToSchema)]
pub struct UpdateRoleDto {
    pub role: Role,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UserFilterParams {
    /// Partial match on first or last name
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}
