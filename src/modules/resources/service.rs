use anyhow::anyhow;
use learnhub_core::{AppError, PaginationMeta, contains_pattern};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use crate::middleware::auth::AuthUser;
use crate::utils::auth_helpers::ensure_owner_or_staff;

use super::model::{
    CreateResourceCategoryDto, CreateResourceDto, PaginatedResourceCategoriesResponse,
    PaginatedResourcesResponse, Resource, ResourceCategory, ResourceCategoryFilterParams,
    ResourceFilterParams, UpdateResourceCategoryDto, UpdateResourceDto,
};

const CATEGORY_COLUMNS: &str = "id, name, image, created_at, updated_at";
const RESOURCE_COLUMNS: &str =
    "id, name, description, media, image, category_id, user_id, created_at, updated_at";

pub struct ResourceCategoryService;

impl ResourceCategoryService {
    #[instrument(skip(db, dto), fields(category.name = %dto.name, db.operation = "INSERT", db.table = "resource_categories"))]
    pub async fn create_category(
        db: &PgPool,
        dto: CreateResourceCategoryDto,
    ) -> Result<ResourceCategory, AppError> {
        let category = sqlx::query_as::<_, ResourceCategory>(&format!(
            "INSERT INTO resource_categories (name, image) VALUES ($1, $2) RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(&dto.image)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Resource category"))?;

        info!(category.id = %category.id, "Resource category created");
        Ok(category)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "resource_categories"))]
    pub async fn get_categories(
        db: &PgPool,
        filters: ResourceCategoryFilterParams,
    ) -> Result<PaginatedResourceCategoriesResponse, AppError> {
        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM resource_categories WHERE 1=1");
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM resource_categories WHERE 1=1",
            CATEGORY_COLUMNS
        ));
        if let Some(name) = &filters.name {
            let pattern = contains_pattern(name);
            count.push(" AND name ILIKE ").push_bind(pattern.clone());
            query.push(" AND name ILIKE ").push_bind(pattern);
        }

        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        query
            .push(" ORDER BY name LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let categories = query
            .build_query_as::<ResourceCategory>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedResourceCategoriesResponse {
            data: categories,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(category.id = %id, db.operation = "SELECT", db.table = "resource_categories"))]
    pub async fn get_category(db: &PgPool, id: i64) -> Result<ResourceCategory, AppError> {
        sqlx::query_as::<_, ResourceCategory>(&format!(
            "SELECT {} FROM resource_categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Resource category not found")))
    }

    #[instrument(skip(db, dto), fields(category.id = %id, db.operation = "UPDATE", db.table = "resource_categories"))]
    pub async fn update_category(
        db: &PgPool,
        id: i64,
        dto: UpdateResourceCategoryDto,
    ) -> Result<ResourceCategory, AppError> {
        let category = sqlx::query_as::<_, ResourceCategory>(&format!(
            "UPDATE resource_categories SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                updated_at = NOW()
             WHERE id = $1 RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.image)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::from_db(e, "Resource category"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Resource category not found")))?;

        info!(category.id = %category.id, "Resource category updated");
        Ok(category)
    }

    /// Resources filed under the category are removed with it.
    #[instrument(skip(db), fields(category.id = %id, db.operation = "DELETE", db.table = "resource_categories"))]
    pub async fn delete_category(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM resource_categories WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Resource category not found")));
        }

        info!(category.id = %id, "Resource category deleted");
        Ok(())
    }
}

pub struct ResourceService;

impl ResourceService {
    #[instrument(skip(db, dto), fields(user.id = %user_id, category.id = %dto.category_id, db.operation = "INSERT", db.table = "resources"))]
    pub async fn create_resource(
        db: &PgPool,
        user_id: i64,
        dto: CreateResourceDto,
    ) -> Result<Resource, AppError> {
        let resource = sqlx::query_as::<_, Resource>(&format!(
            "INSERT INTO resources (name, description, media, image, category_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            RESOURCE_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(&dto.description)
        .bind(&dto.media)
        .bind(&dto.image)
        .bind(dto.category_id)
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Resource"))?;

        info!(resource.id = %resource.id, "Resource created");
        Ok(resource)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "resources"))]
    pub async fn get_resources(
        db: &PgPool,
        filters: ResourceFilterParams,
    ) -> Result<PaginatedResourcesResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM resources WHERE 1=1");
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM resources WHERE 1=1",
            RESOURCE_COLUMNS
        ));
        if let Some(category_id) = filters.category_id {
            count.push(" AND category_id = ").push_bind(category_id);
            query.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(name) = &filters.name {
            let pattern = contains_pattern(name);
            count.push(" AND name ILIKE ").push_bind(pattern.clone());
            query.push(" AND name ILIKE ").push_bind(pattern);
        }

        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let resources = query.build_query_as::<Resource>().fetch_all(db).await?;

        debug!(total, returned = resources.len(), "Resources fetched");

        Ok(PaginatedResourcesResponse {
            data: resources,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(resource.id = %id, db.operation = "SELECT", db.table = "resources"))]
    pub async fn get_resource(db: &PgPool, id: i64) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>(&format!(
            "SELECT {} FROM resources WHERE id = $1",
            RESOURCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Resource not found")))
    }

    #[instrument(skip(db, auth_user, dto), fields(resource.id = %id, db.operation = "UPDATE", db.table = "resources"))]
    pub async fn update_resource(
        db: &PgPool,
        auth_user: &AuthUser,
        id: i64,
        dto: UpdateResourceDto,
    ) -> Result<Resource, AppError> {
        let existing = Self::get_resource(db, id).await?;
        ensure_owner_or_staff(auth_user, existing.user_id, "resources")?;

        let resource = sqlx::query_as::<_, Resource>(&format!(
            "UPDATE resources SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                media = COALESCE($4, media),
                image = COALESCE($5, image),
                category_id = COALESCE($6, category_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            RESOURCE_COLUMNS
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(&dto.media)
        .bind(&dto.image)
        .bind(dto.category_id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Resource"))?;

        info!(resource.id = %resource.id, "Resource updated");
        Ok(resource)
    }

    #[instrument(skip(db, auth_user), fields(resource.id = %id, db.operation = "DELETE", db.table = "resources"))]
    pub async fn delete_resource(
        db: &PgPool,
        auth_user: &AuthUser,
        id: i64,
    ) -> Result<(), AppError> {
        let existing = Self::get_resource(db, id).await?;
        ensure_owner_or_staff(auth_user, existing.user_id, "resources")?;

        sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(resource.id = %id, "Resource deleted");
        Ok(())
    }
}
