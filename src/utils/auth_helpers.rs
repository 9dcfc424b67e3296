use anyhow::anyhow;
use learnhub_core::AppError;
use sqlx::PgPool;

use crate::middleware::auth::AuthUser;

/// Staff pass; everyone else must be `owner_id`.
pub fn ensure_owner_or_staff(
    auth_user: &AuthUser,
    owner_id: i64,
    entity: &str,
) -> Result<(), AppError> {
    if auth_user.is_staff() || auth_user.id() == owner_id {
        return Ok(());
    }
    Err(AppError::forbidden(format!(
        "You can only modify your own {}",
        entity
    )))
}

/// Fails with 404 when the center does not exist and 403 when the caller
/// neither owns it nor is staff.
pub async fn ensure_center_manager(
    db: &PgPool,
    auth_user: &AuthUser,
    center_id: i64,
) -> Result<(), AppError> {
    let owner_id =
        sqlx::query_scalar::<_, i64>("SELECT owner_id FROM learning_centers WHERE id = $1")
            .bind(center_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Learning center not found")))?;

    if auth_user.is_staff() || auth_user.id() == owner_id {
        return Ok(());
    }
    Err(AppError::forbidden(
        "You do not manage this learning center",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use learnhub_auth::{Principal, Role};

    fn user(id: i64, role: Role) -> AuthUser {
        AuthUser(Principal { id, role })
    }

    #[test]
    fn test_owner_passes() {
        assert!(ensure_owner_or_staff(&user(3, Role::User), 3, "comment").is_ok());
    }

    #[test]
    fn test_staff_passes() {
        assert!(ensure_owner_or_staff(&user(1, Role::Admin), 3, "comment").is_ok());
        assert!(ensure_owner_or_staff(&user(1, Role::SuperAdmin), 3, "comment").is_ok());
    }

    #[test]
    fn test_ceo_is_not_staff() {
        let err = ensure_owner_or_staff(&user(1, Role::Ceo), 3, "resource").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.error.to_string(), "You can only modify your own resource");
    }
}
