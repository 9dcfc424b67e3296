use anyhow::anyhow;
use chrono::Utc;
use learnhub_core::{AppError, PaginationMeta};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use crate::metrics;
use crate::middleware::auth::AuthUser;
use crate::utils::auth_helpers::{ensure_center_manager, ensure_owner_or_staff};

use super::model::{
    CreateRegistrationDto, PaginatedRegistrationsResponse, Registration, RegistrationFilterParams,
    RegistrationStatus,
};

const REGISTRATION_COLUMNS: &str =
    "id, user_id, center_id, branch_id, visit_date, status, created_at, updated_at";

pub struct RegistrationService;

impl RegistrationService {
    #[instrument(skip(db, dto), fields(user.id = %user_id, center.id = %dto.center_id, db.operation = "INSERT", db.table = "registrations"))]
    pub async fn create_registration(
        db: &PgPool,
        user_id: i64,
        dto: CreateRegistrationDto,
    ) -> Result<Registration, AppError> {
        if dto.visit_date <= Utc::now() {
            return Err(AppError::unprocessable(anyhow!(
                "visit_date must be in the future"
            )));
        }

        if let Some(branch_id) = dto.branch_id {
            let branch_center =
                sqlx::query_scalar::<_, i64>("SELECT center_id FROM branches WHERE id = $1")
                    .bind(branch_id)
                    .fetch_optional(db)
                    .await?;
            if branch_center != Some(dto.center_id) {
                return Err(AppError::bad_request(anyhow!(
                    "Branch does not belong to this learning center"
                )));
            }
        }

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "INSERT INTO registrations (user_id, center_id, branch_id, visit_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .bind(dto.center_id)
        .bind(dto.branch_id)
        .bind(dto.visit_date)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Registration"))?;

        metrics::track_registration_created();
        info!(registration.id = %registration.id, "Registration created");
        Ok(registration)
    }

    #[instrument(skip(db), fields(user.id = %user_id, db.operation = "SELECT", db.table = "registrations"))]
    pub async fn get_user_registrations(
        db: &PgPool,
        user_id: i64,
    ) -> Result<Vec<Registration>, AppError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {} FROM registrations WHERE user_id = $1 ORDER BY visit_date DESC",
            REGISTRATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(registrations)
    }

    fn push_filters(
        builder: &mut QueryBuilder<'_, Postgres>,
        auth_user: &AuthUser,
        filters: &RegistrationFilterParams,
    ) {
        if !auth_user.is_staff() {
            builder
                .push(" AND center_id IN (SELECT id FROM learning_centers WHERE owner_id = ")
                .push_bind(auth_user.id())
                .push(")");
        }
        if let Some(center_id) = filters.center_id {
            builder.push(" AND center_id = ").push_bind(center_id);
        }
        if let Some(status) = filters.status {
            builder.push(" AND status = ").push_bind(status);
        }
    }

    /// Staff see every registration; center owners see those for their own centers.
    #[instrument(skip(db, auth_user, filters), fields(user.id = %auth_user.id(), db.operation = "SELECT", db.table = "registrations"))]
    pub async fn get_registrations(
        db: &PgPool,
        auth_user: &AuthUser,
        filters: RegistrationFilterParams,
    ) -> Result<PaginatedRegistrationsResponse, AppError> {
        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM registrations WHERE 1=1");
        Self::push_filters(&mut count, auth_user, &filters);
        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM registrations WHERE 1=1",
            REGISTRATION_COLUMNS
        ));
        Self::push_filters(&mut query, auth_user, &filters);
        query
            .push(" ORDER BY visit_date ASC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let registrations = query
            .build_query_as::<Registration>()
            .fetch_all(db)
            .await?;

        debug!(total, returned = registrations.len(), "Registrations fetched");

        Ok(PaginatedRegistrationsResponse {
            data: registrations,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    async fn get_registration(db: &PgPool, id: i64) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>(&format!(
            "SELECT {} FROM registrations WHERE id = $1",
            REGISTRATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Registration not found")))
    }

    #[instrument(skip(db, auth_user), fields(registration.id = %id, db.operation = "UPDATE", db.table = "registrations"))]
    pub async fn update_status(
        db: &PgPool,
        auth_user: &AuthUser,
        id: i64,
        status: RegistrationStatus,
    ) -> Result<Registration, AppError> {
        let existing = Self::get_registration(db, id).await?;
        ensure_center_manager(db, auth_user, existing.center_id).await?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "UPDATE registrations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            REGISTRATION_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_one(db)
        .await?;

        info!(registration.id = %id, status = ?status, "Registration status changed");
        Ok(registration)
    }

    #[instrument(skip(db, auth_user), fields(registration.id = %id, db.operation = "DELETE", db.table = "registrations"))]
    pub async fn delete_registration(
        db: &PgPool,
        auth_user: &AuthUser,
        id: i64,
    ) -> Result<(), AppError> {
        let existing = Self::get_registration(db, id).await?;
        ensure_owner_or_staff(auth_user, existing.user_id, "registrations")?;

        sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(registration.id = %id, "Registration deleted");
        Ok(())
    }
}
