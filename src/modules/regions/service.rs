use anyhow::anyhow;
use learnhub_core::{AppError, PaginationMeta, contains_pattern};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use super::model::{
    CreateRegionDto, PaginatedRegionsResponse, Region, RegionFilterParams, UpdateRegionDto,
};

const REGION_COLUMNS: &str = "id, name, created_at, updated_at";

pub struct RegionService;

impl RegionService {
    #[instrument(skip(db, dto), fields(region.name = %dto.name, db.operation = "INSERT", db.table = "regions"))]
    pub async fn create_region(db: &PgPool, dto: CreateRegionDto) -> Result<Region, AppError> {
        let region = sqlx::query_as::<_, Region>(&format!(
            "INSERT INTO regions (name) VALUES ($1) RETURNING {}",
            REGION_COLUMNS
        ))
        .bind(dto.name.trim())
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Region"))?;

        info!(region.id = %region.id, "Region created");
        Ok(region)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "regions"))]
    pub async fn get_regions(
        db: &PgPool,
        filters: RegionFilterParams,
    ) -> Result<PaginatedRegionsResponse, AppError> {
        let name = filters.name.as_ref().map(|n| contains_pattern(n));

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM regions WHERE 1=1");
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM regions WHERE 1=1",
            REGION_COLUMNS
        ));
        if let Some(name) = &name {
            count.push(" AND name ILIKE ").push_bind(name.clone());
            query.push(" AND name ILIKE ").push_bind(name.clone());
        }

        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        query
            .push(" ORDER BY name LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let regions = query.build_query_as::<Region>().fetch_all(db).await?;

        debug!(total, returned = regions.len(), "Regions fetched");

        Ok(PaginatedRegionsResponse {
            data: regions,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(region.id = %id, db.operation = "SELECT", db.table = "regions"))]
    pub async fn get_region(db: &PgPool, id: i64) -> Result<Region, AppError> {
        sqlx::query_as::<_, Region>(&format!(
            "SELECT {} FROM regions WHERE id = $1",
            REGION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Region not found")))
    }

    #[instrument(skip(db, dto), fields(region.id = %id, db.operation = "UPDATE", db.table = "regions"))]
    pub async fn update_region(
        db: &PgPool,
        id: i64,
        dto: UpdateRegionDto,
    ) -> Result<Region, AppError> {
        let region = sqlx::query_as::<_, Region>(&format!(
            "UPDATE regions SET name = COALESCE($2, name), updated_at = NOW()
             WHERE id = $1 RETURNING {}",
            REGION_COLUMNS
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::from_db(e, "Region"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Region not found")))?;

        info!(region.id = %region.id, "Region updated");
        Ok(region)
    }

    /// Regions still referenced by centers or branches cannot be deleted.
    #[instrument(skip(db), fields(region.id = %id, db.operation = "DELETE", db.table = "regions"))]
    pub async fn delete_region(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM regions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    AppError::conflict(anyhow!("Region is still used by learning centers"))
                }
                _ => AppError::from(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Region not found")));
        }

        info!(region.id = %id, "Region deleted");
        Ok(())
    }
}
