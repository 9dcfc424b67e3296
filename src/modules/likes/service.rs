use anyhow::anyhow;
use learnhub_core::AppError;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{Like, LikedCenter};

pub struct LikeService;

impl LikeService {
    /// A user likes a center at most once; a second like is a 409.
    #[instrument(skip(db), fields(db.operation = "INSERT", db.table = "likes"))]
    pub async fn like_center(db: &PgPool, user_id: i64, center_id: i64) -> Result<Like, AppError> {
        let like = sqlx::query_as::<_, Like>(
            "INSERT INTO likes (user_id, center_id) VALUES ($1, $2)
             RETURNING id, user_id, center_id, created_at",
        )
        .bind(user_id)
        .bind(center_id)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Like"))?;

        info!(like.id = %like.id, "Center liked");
        Ok(like)
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "likes"))]
    pub async fn unlike_center(db: &PgPool, user_id: i64, center_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND center_id = $2")
            .bind(user_id)
            .bind(center_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Like not found")));
        }
        Ok(())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "likes"))]
    pub async fn get_user_likes(db: &PgPool, user_id: i64) -> Result<Vec<LikedCenter>, AppError> {
        let centers = sqlx::query_as::<_, LikedCenter>(
            "SELECT c.id AS center_id, c.name, c.image, c.address, l.created_at AS liked_at
             FROM likes l
             JOIN learning_centers c ON c.id = l.center_id
             WHERE l.user_id = $1
             ORDER BY l.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(centers)
    }
}
