use anyhow::anyhow;
use learnhub_core::{AppError, PaginationMeta};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument, warn};

use crate::middleware::auth::AuthUser;
use crate::utils::auth_helpers::ensure_owner_or_staff;

use super::model::{
    Comment, CommentFilterParams, CommentWithAuthor, CreateCommentDto, PaginatedCommentsResponse,
    UpdateCommentDto,
};

const COMMENT_COLUMNS: &str = "id, text, star, user_id, center_id, created_at, updated_at";

pub struct CommentService;

impl CommentService {
    #[instrument(skip(db, dto), fields(user.id = %user_id, center.id = %dto.center_id, db.operation = "INSERT", db.table = "comments"))]
    pub async fn create_comment(
        db: &PgPool,
        user_id: i64,
        dto: CreateCommentDto,
    ) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (text, star, user_id, center_id) VALUES ($1, $2, $3, $4)
             RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(&dto.text)
        .bind(dto.star)
        .bind(user_id)
        .bind(dto.center_id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Comment"))?;

        info!(comment.id = %comment.id, "Comment created");
        Ok(comment)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "comments"))]
    pub async fn get_comments(
        db: &PgPool,
        filters: CommentFilterParams,
    ) -> Result<PaginatedCommentsResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM comments cm WHERE 1=1");
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT cm.id, cm.text, cm.star, cm.user_id, cm.center_id, cm.created_at, cm.updated_at,
                    u.first_name AS author_first_name, u.last_name AS author_last_name
             FROM comments cm
             JOIN users u ON u.id = cm.user_id
             WHERE 1=1",
        );
        if let Some(center_id) = filters.center_id {
            count.push(" AND cm.center_id = ").push_bind(center_id);
            query.push(" AND cm.center_id = ").push_bind(center_id);
        }

        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        query
            .push(" ORDER BY cm.created_at DESC LIMIT ")
            .push_bind(filters.pagination.limit())
            .push(" OFFSET ")
            .push_bind(filters.pagination.offset());
        let comments = query
            .build_query_as::<CommentWithAuthor>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedCommentsResponse {
            data: comments,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    async fn get_comment(db: &PgPool, id: i64) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Comment not found")))
    }

    /// Only the author may edit a comment; staff can delete but not rewrite it.
    #[instrument(skip(db, auth_user, dto), fields(comment.id = %id, db.operation = "UPDATE", db.table = "comments"))]
    pub async fn update_comment(
        db: &PgPool,
        auth_user: &AuthUser,
        id: i64,
        dto: UpdateCommentDto,
    ) -> Result<Comment, AppError> {
        let existing = Self::get_comment(db, id).await?;
        if existing.user_id != auth_user.id() {
            warn!(user.id = %auth_user.id(), "Attempt to edit another user's comment");
            return Err(AppError::forbidden("You can only edit your own comments"));
        }

        let comment = sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET
                text = COALESCE($2, text),
                star = COALESCE($3, star),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .bind(&dto.text)
        .bind(dto.star)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Comment"))?;

        info!(comment.id = %comment.id, "Comment updated");
        Ok(comment)
    }

    #[instrument(skip(db, auth_user), fields(comment.id = %id, db.operation = "DELETE", db.table = "comments"))]
    pub async fn delete_comment(db: &PgPool, auth_user: &AuthUser, id: i64) -> Result<(), AppError> {
        let existing = Self::get_comment(db, id).await?;
        ensure_owner_or_staff(auth_user, existing.user_id, "comments")?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(comment.id = %id, "Comment deleted");
        Ok(())
    }
}
