use anyhow::anyhow;
use learnhub_core::{AppError, PaginationMeta};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use crate::middleware::auth::AuthUser;
use crate::utils::auth_helpers::ensure_center_manager;

use super::model::{
    Branch, BranchFilterParams, CreateBranchDto, PaginatedBranchesResponse, UpdateBranchDto,
};

pub(crate) const BRANCH_COLUMNS: &str =
    "id, name, phone, address, image, center_id, region_id, created_at, updated_at";

pub struct BranchService;

impl BranchService {
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &BranchFilterParams) {
        if let Some(center_id) = filters.center_id {
            builder.push(" AND center_id = ").push_bind(center_id);
        }
        if let Some(region_id) = filters.region_id {
            builder.push(" AND region_id = ").push_bind(region_id);
        }
    }

    #[instrument(skip(db, auth_user, dto), fields(center.id = %dto.center_id, db.operation = "INSERT", db.table = "branches"))]
    pub async fn create_branch(
        db: &PgPool,
        auth_user: &AuthUser,
        dto: CreateBranchDto,
    ) -> Result<Branch, AppError> {
        ensure_center_manager(db, auth_user, dto.center_id).await?;

        let branch = sqlx::query_as::<_, Branch>(&format!(
            "INSERT INTO branches (name, phone, address, image, center_id, region_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            BRANCH_COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.image)
        .bind(dto.center_id)
        .bind(dto.region_id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Branch"))?;

        info!(branch.id = %branch.id, "Branch created");
        Ok(branch)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "branches"))]
    pub async fn get_branches(
        db: &PgPool,
        filters: BranchFilterParams,
    ) -> Result<PaginatedBranchesResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM branches WHERE 1=1");
        Self::push_filters(&mut count, &filters);
        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM branches WHERE 1=1",
            BRANCH_COLUMNS
        ));
        Self::push_filters(&mut query, &filters);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let branches = query.build_query_as::<Branch>().fetch_all(db).await?;

        debug!(total, returned = branches.len(), "Branches fetched");

        Ok(PaginatedBranchesResponse {
            data: branches,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(branch.id = %id, db.operation = "SELECT", db.table = "branches"))]
    pub async fn get_branch(db: &PgPool, id: i64) -> Result<Branch, AppError> {
        sqlx::query_as::<_, Branch>(&format!(
            "SELECT {} FROM branches WHERE id = $1",
            BRANCH_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Branch not found")))
    }

    pub async fn get_center_branches(db: &PgPool, center_id: i64) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<_, Branch>(&format!(
            "SELECT {} FROM branches WHERE center_id = $1 ORDER BY name",
            BRANCH_COLUMNS
        ))
        .bind(center_id)
        .fetch_all(db)
        .await?;
        Ok(branches)
    }

    #[instrument(skip(db, auth_user, dto), fields(branch.id = %id, db.operation = "UPDATE", db.table = "branches"))]
    pub async fn update_branch(
        db: &PgPool,
        auth_user: &AuthUser,
        id: i64,
        dto: UpdateBranchDto,
    ) -> Result<Branch, AppError> {
        let existing = Self::get_branch(db, id).await?;
        ensure_center_manager(db, auth_user, existing.center_id).await?;

        let branch = sqlx::query_as::<_, Branch>(&format!(
            "UPDATE branches SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                image = COALESCE($5, image),
                region_id = COALESCE($6, region_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            BRANCH_COLUMNS
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.image)
        .bind(dto.region_id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Branch"))?;

        info!(branch.id = %branch.id, "Branch updated");
        Ok(branch)
    }

    #[instrument(skip(db, auth_user), fields(branch.id = %id, db.operation = "DELETE", db.table = "branches"))]
    pub async fn delete_branch(db: &PgPool, auth_user: &AuthUser, id: i64) -> Result<(), AppError> {
        let existing = Self::get_branch(db, id).await?;
        ensure_center_manager(db, auth_user, existing.center_id).await?;

        sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(branch.id = %id, "Branch deleted");
        Ok(())
    }
}
