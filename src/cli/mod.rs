//! Administrative operations used by the `learnhub-cli` binary.
//!
//! SUPER_ADMIN accounts cannot be created through the HTTP API; the first one
//! has to be bootstrapped here.

use anyhow::{Context, bail};
use learnhub_auth::Role;
use learnhub_core::hash_password;
use sqlx::PgPool;
use tracing::info;

/// Inserts a SUPER_ADMIN and returns its id. Fails if the email is taken.
pub async fn create_super_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<i64> {
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }
    let hashed_password = hash_password(password).map_err(|e| e.error)?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (first_name, last_name, email, password, role)
         VALUES ($1, $2, LOWER($3), $4, $5)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(email.trim())
    .bind(hashed_password)
    .bind(Role::SuperAdmin)
    .fetch_optional(db)
    .await
    .context("Failed to insert super admin")?;

    match id {
        Some(id) => {
            info!(user.id = %id, "Super admin created");
            Ok(id)
        }
        None => bail!("User with this email already exists"),
    }
}

/// Changes the role of the user registered under `email`.
pub async fn set_user_role(db: &PgPool, email: &str, role: Role) -> anyhow::Result<()> {
    let result = sqlx::query(
        "UPDATE users SET role = $2, updated_at = NOW() WHERE email = LOWER($1)",
    )
    .bind(email.trim())
    .bind(role)
    .execute(db)
    .await
    .context("Failed to update role")?;

    if result.rows_affected() == 0 {
        bail!("No user with email {}", email);
    }

    info!(email = %email, role = %role, "Role changed");
    Ok(())
}
