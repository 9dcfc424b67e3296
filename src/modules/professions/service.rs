use anyhow::anyhow;
use learnhub_core::{AppError, PaginationMeta, contains_pattern};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use super::model::{
    CreateProfessionDto, PaginatedProfessionsResponse, Profession, ProfessionFilterParams, UpdateProfessionDto,
};

pub(crate) const PROFESSION_COLUMNS: &str = "id, name, image, created_at, updated_at";

pub struct ProfessionService;

impl ProfessionService {
    #[instrument(skip(db, dto), fields(profession.name = %dto.name, db.operation = "INSERT", db.table = "professions"))]
    pub async fn create_profession(db: &PgPool, dto: CreateProfessionDto) -> Result<Profession, AppError> {
        let profession = sqlx::query_as::<_, Profession>(&format!(
            "INSERT INTO professions (name, image) VALUES ($1, $2) RETURNING {}",
            PROFESSION_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(&dto.image)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Profession"))?;

        info!(profession.id = %profession.id, "Profession created");
        Ok(profession)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "professions"))]
    pub async fn get_professions(
        db: &PgPool,
        filters: ProfessionFilterParams,
    ) -> Result<PaginatedProfessionsResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM professions WHERE 1=1");
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM professions WHERE 1=1",
            PROFESSION_COLUMNS
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
        let professions = query.build_query_as::<Profession>().fetch_all(db).await?;

        debug!(total, returned = professions.len(), "Professions fetched");

        Ok(PaginatedProfessionsResponse {
            data: professions,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(profession.id = %id, db.operation = "SELECT", db.table = "professions"))]
    pub async fn get_profession(db: &PgPool, id: i64) -> Result<Profession, AppError> {
        sqlx::query_as::<_, Profession>(&format!(
            "SELECT {} FROM professions WHERE id = $1",
            PROFESSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Profession not found")))
    }

    #[instrument(skip(db, dto), fields(profession.id = %id, db.operation = "UPDATE", db.table = "professions"))]
    pub async fn update_profession(
        db: &PgPool,
        id: i64,
        dto: UpdateProfessionDto,
    ) -> Result<Profession, AppError> {
        let profession = sqlx::query_as::<_, Profession>(&format!(
            "UPDATE professions SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                updated_at = NOW()
             WHERE id = $1 RETURNING {}",
            PROFESSION_COLUMNS
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.image)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::from_db(e, "Profession"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Profession not found")))?;

        info!(profession.id = %profession.id, "Profession updated");
        Ok(profession)
    }

    /// Removing a profession also drops it from every center that listed it.
    #[instrument(skip(db), fields(profession.id = %id, db.operation = "DELETE", db.table = "professions"))]
    pub async fn delete_profession(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM professions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Profession not found")));
        }

        info!(profession.id = %id, "Profession deleted");
        Ok(())
    }
}
