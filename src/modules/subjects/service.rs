use anyhow::anyhow;
use learnhub_core::{AppError, PaginationMeta, contains_pattern};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use super::model::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, SubjectFilterParams, UpdateSubjectDto,
};

pub(crate) const SUBJECT_COLUMNS: &str = "id, name, image, created_at, updated_at";

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(db, dto), fields(subject.name = %dto.name, db.operation = "INSERT", db.table = "subjects"))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(&format!(
            "INSERT INTO subjects (name, image) VALUES ($1, $2) RETURNING {}",
            SUBJECT_COLUMNS
        ))
        .bind(dto.name.trim())
        .bind(&dto.image)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Subject"))?;

        info!(subject.id = %subject.id, "Subject created");
        Ok(subject)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "subjects"))]
    pub async fn get_subjects(
        db: &PgPool,
        filters: SubjectFilterParams,
    ) -> Result<PaginatedSubjectsResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM subjects WHERE 1=1");
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM subjects WHERE 1=1",
            SUBJECT_COLUMNS
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
        let subjects = query.build_query_as::<Subject>().fetch_all(db).await?;

        debug!(total, returned = subjects.len(), "Subjects fetched");

        Ok(PaginatedSubjectsResponse {
            data: subjects,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db), fields(subject.id = %id, db.operation = "SELECT", db.table = "subjects"))]
    pub async fn get_subject(db: &PgPool, id: i64) -> Result<Subject, AppError> {
        sqlx::query_as::<_, Subject>(&format!(
            "SELECT {} FROM subjects WHERE id = $1",
            SUBJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Subject not found")))
    }

    #[instrument(skip(db, dto), fields(subject.id = %id, db.operation = "UPDATE", db.table = "subjects"))]
    pub async fn update_subject(
        db: &PgPool,
        id: i64,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(&format!(
            "UPDATE subjects SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                updated_at = NOW()
             WHERE id = $1 RETURNING {}",
            SUBJECT_COLUMNS
        ))
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.image)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::from_db(e, "Subject"))?
        .ok_or_else(|| AppError::not_found(anyhow!("Subject not found")))?;

        info!(subject.id = %subject.id, "Subject updated");
        Ok(subject)
    }

    /// Removing a subject also drops it from every center that offered it.
    #[instrument(skip(db), fields(subject.id = %id, db.operation = "DELETE", db.table = "subjects"))]
    pub async fn delete_subject(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Subject not found")));
        }

        info!(subject.id = %id, "Subject deleted");
        Ok(())
    }
}
