use anyhow::anyhow;
use learnhub_core::{AppError, PaginationMeta, contains_pattern};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, info, instrument};

use crate::metrics;
use crate::middleware::auth::AuthUser;
use crate::modules::branches::service::BranchService;
use crate::modules::professions::model::Profession;
use crate::modules::subjects::model::Subject;
use crate::utils::auth_helpers::ensure_center_manager;

use super::model::{
    CenterDetails, CenterFilterParams, CenterSummary, CreateCenterDto, LearningCenter,
    PaginatedCentersResponse, UpdateCenterDto,
};

const CENTER_COLUMNS: &str = "id, name, phone, address, description, image, region_id, owner_id, created_at, updated_at";

const SUMMARY_SELECT: &str = "SELECT c.id, c.name, c.phone, c.address, c.description, c.image,
        c.region_id, c.owner_id, c.created_at, c.updated_at,
        r.name AS region_name,
        (SELECT COUNT(*) FROM likes l WHERE l.center_id = c.id) AS like_count,
        (SELECT COUNT(*) FROM comments cm WHERE cm.center_id = c.id) AS comment_count,
        (SELECT AVG(cm.star)::FLOAT8 FROM comments cm WHERE cm.center_id = c.id) AS average_rating
    FROM learning_centers c
    JOIN regions r ON r.id = c.region_id
    WHERE 1=1";

/// A many-to-many link table between centers and a catalog table.
#[derive(Debug, Clone, Copy)]
struct CenterLink {
    join_table: &'static str,
    column: &'static str,
    target_table: &'static str,
    entity: &'static str,
}

const SUBJECT_LINK: CenterLink = CenterLink {
    join_table: "center_subjects",
    column: "subject_id",
    target_table: "subjects",
    entity: "subject",
};

const PROFESSION_LINK: CenterLink = CenterLink {
    join_table: "center_professions",
    column: "profession_id",
    target_table: "professions",
    entity: "profession",
};

/// Sorted, deduplicated copy of `ids`.
fn normalize_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub struct CenterService;

impl CenterService {
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &CenterFilterParams) {
        if let Some(name) = &filters.name {
            builder
                .push(" AND c.name ILIKE ")
                .push_bind(contains_pattern(name));
        }
        if let Some(region_id) = filters.region_id {
            builder.push(" AND c.region_id = ").push_bind(region_id);
        }
        if let Some(subject_id) = filters.subject_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM center_subjects cs WHERE cs.center_id = c.id AND cs.subject_id = ")
                .push_bind(subject_id)
                .push(")");
        }
        if let Some(profession_id) = filters.profession_id {
            builder
                .push(" AND EXISTS (SELECT 1 FROM center_professions cp WHERE cp.center_id = c.id AND cp.profession_id = ")
                .push_bind(profession_id)
                .push(")");
        }
    }

    /// Fails with 400 listing every id in `ids` that has no row in the target table.
    async fn ensure_link_targets_exist(
        db: &PgPool,
        link: CenterLink,
        ids: &[i64],
    ) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }

        let found = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT id FROM {} WHERE id = ANY($1)",
            link.target_table
        ))
        .bind(ids)
        .fetch_all(db)
        .await?;

        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::bad_request(anyhow!(
                "Unknown {} ids: {:?}",
                link.entity,
                missing
            )));
        }
        Ok(())
    }

    async fn replace_links(
        db: &PgPool,
        link: CenterLink,
        center_id: i64,
        ids: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE center_id = $1",
            link.join_table
        ))
        .bind(center_id)
        .execute(db)
        .await?;

        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query(&format!(
            "INSERT INTO {} (center_id, {}) SELECT $1, id FROM {} WHERE id = ANY($2)
             ON CONFLICT DO NOTHING",
            link.join_table, link.column, link.target_table
        ))
        .bind(center_id)
        .bind(ids)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db, dto), fields(center.name = %dto.name, center.owner_id = %owner_id, db.operation = "INSERT", db.table = "learning_centers"))]
    pub async fn create_center(
        db: &PgPool,
        owner_id: i64,
        dto: CreateCenterDto,
    ) -> Result<CenterDetails, AppError> {
        let subject_ids = normalize_ids(&dto.subject_ids);
        let profession_ids = normalize_ids(&dto.profession_ids);
        Self::ensure_link_targets_exist(db, SUBJECT_LINK, &subject_ids).await?;
        Self::ensure_link_targets_exist(db, PROFESSION_LINK, &profession_ids).await?;

        let center = sqlx::query_as::<_, LearningCenter>(&format!(
            "INSERT INTO learning_centers (name, phone, address, description, image, region_id, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            CENTER_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.description)
        .bind(&dto.image)
        .bind(dto.region_id)
        .bind(owner_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            let err = AppError::from_db(e, "Learning center");
            if err.status.is_server_error() {
                error!(error = %err.error, "Database error creating learning center");
            }
            err
        })?;

        Self::replace_links(db, SUBJECT_LINK, center.id, &subject_ids).await?;
        Self::replace_links(db, PROFESSION_LINK, center.id, &profession_ids).await?;

        metrics::track_center_created();
        info!(center.id = %center.id, "Learning center created");

        Self::get_center(db, center.id).await
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "learning_centers"))]
    pub async fn get_centers(
        db: &PgPool,
        filters: CenterFilterParams,
    ) -> Result<PaginatedCentersResponse, AppError> {
        debug!(
            filter.name = ?filters.name,
            filter.region_id = ?filters.region_id,
            filter.subject_id = ?filters.subject_id,
            filter.profession_id = ?filters.profession_id,
            "Fetching learning centers"
        );

        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM learning_centers c WHERE 1=1");
        Self::push_filters(&mut count, &filters);
        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(SUMMARY_SELECT);
        Self::push_filters(&mut query, &filters);
        query
            .push(" ORDER BY c.created_at DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let centers = query.build_query_as::<CenterSummary>().fetch_all(db).await?;

        Ok(PaginatedCentersResponse {
            data: centers,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(center.id = %id, db.operation = "SELECT", db.table = "learning_centers"))]
    pub async fn get_center(db: &PgPool, id: i64) -> Result<CenterDetails, AppError> {
        let summary = sqlx::query_as::<_, CenterSummary>(&format!("{} AND c.id = $1", SUMMARY_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Learning center not found")))?;

        let branches = BranchService::get_center_branches(db, id).await?;

        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT s.id, s.name, s.image, s.created_at, s.updated_at
             FROM subjects s
             JOIN center_subjects cs ON cs.subject_id = s.id
             WHERE cs.center_id = $1
             ORDER BY s.name",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        let professions = sqlx::query_as::<_, Profession>(
            "SELECT p.id, p.name, p.image, p.created_at, p.updated_at
             FROM professions p
             JOIN center_professions cp ON cp.profession_id = p.id
             WHERE cp.center_id = $1
             ORDER BY p.name",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(CenterDetails {
            summary,
            branches,
            subjects,
            professions,
        })
    }

    #[instrument(skip(db, auth_user, dto), fields(center.id = %id, db.operation = "UPDATE", db.table = "learning_centers"))]
    pub async fn update_center(
        db: &PgPool,
        auth_user: &AuthUser,
        id: i64,
        dto: UpdateCenterDto,
    ) -> Result<CenterDetails, AppError> {
        ensure_center_manager(db, auth_user, id).await?;

        let subject_ids = dto.subject_ids.as_deref().map(normalize_ids);
        let profession_ids = dto.profession_ids.as_deref().map(normalize_ids);
        if let Some(ids) = &subject_ids {
            Self::ensure_link_targets_exist(db, SUBJECT_LINK, ids).await?;
        }
        if let Some(ids) = &profession_ids {
            Self::ensure_link_targets_exist(db, PROFESSION_LINK, ids).await?;
        }

        sqlx::query(
            "UPDATE learning_centers SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                description = COALESCE($5, description),
                image = COALESCE($6, image),
                region_id = COALESCE($7, region_id),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.description)
        .bind(&dto.image)
        .bind(dto.region_id)
        .execute(db)
        .await
        .map_err(|e| AppError::from_db(e, "Learning center"))?;

        if let Some(ids) = &subject_ids {
            Self::replace_links(db, SUBJECT_LINK, id, ids).await?;
        }
        if let Some(ids) = &profession_ids {
            Self::replace_links(db, PROFESSION_LINK, id, ids).await?;
        }

        info!(center.id = %id, "Learning center updated");
        Self::get_center(db, id).await
    }

    /// Branches, links, comments, likes, and registrations go with the center.
    #[instrument(skip(db, auth_user), fields(center.id = %id, db.operation = "DELETE", db.table = "learning_centers"))]
    pub async fn delete_center(db: &PgPool, auth_user: &AuthUser, id: i64) -> Result<(), AppError> {
        ensure_center_manager(db, auth_user, id).await?;

        sqlx::query("DELETE FROM learning_centers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(center.id = %id, "Learning center deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ids_sorts_and_dedups() {
        assert_eq!(normalize_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(normalize_ids(&[]).is_empty());
    }
}
