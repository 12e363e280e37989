//! Repository for the `image_likes` join table.

use pictura_core::types::DbId;
use sqlx::PgPool;

pub struct LikeRepo;

impl LikeRepo {
    /// Record that `user_id` likes `image_id`.
    ///
    /// Idempotent: a repeat like changes nothing. The image's like count is
    /// bumped in the same transaction only when a new pair is inserted.
    /// Returns `None` if the image does not exist, otherwise the like count.
    pub async fn like(
        pool: &PgPool,
        user_id: DbId,
        image_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM images WHERE id = $1)",
        )
        .bind(image_id)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            tx.rollback().await?;
            return Ok(None);
        }

        let inserted = sqlx::query(
            "INSERT INTO image_likes (user_id, image_id) VALUES ($1, $2)
             ON CONFLICT (user_id, image_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(image_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let count = if inserted {
            sqlx::query_scalar::<_, i32>(
                "UPDATE images SET number_of_likes = number_of_likes + 1
                 WHERE id = $1
                 RETURNING number_of_likes",
            )
            .bind(image_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_scalar::<_, i32>("SELECT number_of_likes FROM images WHERE id = $1")
                .bind(image_id)
                .fetch_one(&mut *tx)
                .await?
        };

        tx.commit().await?;
        Ok(Some(count))
    }

    pub async fn has_liked(pool: &PgPool, user_id: DbId, image_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM image_likes WHERE user_id = $1 AND image_id = $2)",
        )
        .bind(user_id)
        .bind(image_id)
        .fetch_one(pool)
        .await
    }

    /// Ids of every image the user liked, most recent like first.
    pub async fn liked_image_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT image_id FROM image_likes WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
