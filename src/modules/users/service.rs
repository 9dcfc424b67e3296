use anyhow::anyhow;
use learnhub_auth::Role;
use learnhub_core::{AppError, PaginationMeta, contains_pattern, hash_password, verify_password};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, info, instrument, warn};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{
    ChangePasswordDto, PaginatedUsersResponse, USER_COLUMNS, UpdateProfileDto, User,
    UserCredentials, UserFilterParams,
};

pub struct UserService;

impl UserService {
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &UserFilterParams) {
        if let Some(name) = &filters.name {
            builder
                .push(" AND (first_name || ' ' || last_name) ILIKE ")
                .push_bind(contains_pattern(name));
        }
        if let Some(email) = &filters.email {
            builder
                .push(" AND email ILIKE ")
                .push_bind(contains_pattern(email));
        }
        if let Some(role) = filters.role {
            builder.push(" AND role = ").push_bind(role);
        }
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE 1=1");
        Self::push_filters(&mut count, &filters);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error counting users");
                AppError::from(e)
            })?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM users WHERE 1=1",
            USER_COLUMNS
        ));
        Self::push_filters(&mut query, &filters);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let users = query.build_query_as::<User>().fetch_all(db).await?;

        debug!(total, returned = users.len(), "Users fetched");

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(user.id = %user_id, db.operation = "SELECT", db.table = "users"))]
    pub async fn get_user(db: &PgPool, user_id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    pub async fn find_credentials_by_email(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, role, password FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(credentials)
    }

    #[instrument(skip(db, dto), fields(user.id = %user_id, db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: i64,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                image = COALESCE($5, image),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(dto.first_name)
        .bind(dto.last_name)
        .bind(dto.phone)
        .bind(dto.image)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::from_db(e, "User"))?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        info!(user.id = %user.id, "User profile updated");
        Ok(user)
    }

    /// Staff edit of another user's profile. Only a SUPER_ADMIN may edit a
    /// SUPER_ADMIN.
    #[instrument(skip(db, actor, dto), fields(actor.id = %actor.id(), user.id = %user_id))]
    pub async fn update_user_profile(
        db: &PgPool,
        actor: &AuthUser,
        user_id: i64,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        if actor.id() != user_id {
            let target = Self::get_user(db, user_id).await?;
            if target.role == Role::SuperAdmin && actor.role() != Role::SuperAdmin {
                warn!(actor.id = %actor.id(), user.id = %user_id, "Profile edit of SUPER_ADMIN refused");
                return Err(AppError::forbidden(
                    "Only a SUPER_ADMIN can edit another SUPER_ADMIN",
                ));
            }
        }

        Self::update_profile(db, user_id, dto).await
    }

    #[instrument(skip(db, dto), fields(user.id = %user_id, db.table = "users"))]
    pub async fn change_password(
        db: &PgPool,
        user_id: i64,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let current_hash =
            sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &current_hash)? {
            warn!(user.id = %user_id, "Password change rejected: wrong current password");
            return Err(AppError::bad_request(anyhow!("Current password is incorrect")));
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(new_hash)
            .execute(db)
            .await?;

        info!(user.id = %user_id, "Password changed");
        Ok(())
    }

    #[instrument(skip(db, actor), fields(actor.id = %actor.id(), user.id = %user_id, new_role = %role))]
    pub async fn update_role(
        db: &PgPool,
        actor: &AuthUser,
        user_id: i64,
        role: Role,
    ) -> Result<User, AppError> {
        if actor.id() == user_id {
            return Err(AppError::bad_request(anyhow!(
                "You cannot change your own role"
            )));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(role)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        info!(user.id = %user.id, user.role = %user.role, "User role changed");
        Ok(user)
    }

    /// Deletes a user. Nobody deletes themselves and only a SUPER_ADMIN may
    /// delete another SUPER_ADMIN.
    #[instrument(skip(db, actor), fields(actor.id = %actor.id(), user.id = %user_id, db.operation = "DELETE", db.table = "users"))]
    pub async fn delete_user(db: &PgPool, actor: &AuthUser, user_id: i64) -> Result<(), AppError> {
        if actor.id() == user_id {
            return Err(AppError::bad_request(anyhow!(
                "You cannot delete your own account"
            )));
        }

        let target = Self::get_user(db, user_id).await?;
        if target.role == Role::SuperAdmin && actor.role() != Role::SuperAdmin {
            return Err(AppError::forbidden(
                "Only a SUPER_ADMIN can delete another SUPER_ADMIN",
            ));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await
            .map_err(|e| AppError::from_db(e, "User"))?;

        info!(user.id = %user_id, "User deleted");
        Ok(())
    }
}
