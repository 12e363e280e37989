//! Repository for the `images` table.

use pictura_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{CreateImage, Image, ImageWithOwner, PaidCreation};

const COLUMNS: &str = "id, user_id, prompt, image_url, categories, number_of_likes, \
                        created_at, updated_at";

const OWNER_COLUMNS: &str = "i.id, i.user_id, i.prompt, i.image_url, i.categories, \
                              i.number_of_likes, i.created_at, p.username, p.avatar_url";

pub struct ImageRepo;

impl ImageRepo {
    /// Debit `cost` tokens from the owner and insert the image, in one
    /// transaction.
    ///
    /// The debit is a single conditional `UPDATE`, so concurrent calls can
    /// never overdraw. Returns `None` (and writes nothing) when the balance
    /// is below `cost`.
    pub async fn create_paid(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateImage,
        cost: i32,
    ) -> Result<Option<PaidCreation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let token_balance = sqlx::query_scalar::<_, i32>(
            "UPDATE profiles SET token_balance = token_balance - $2
             WHERE user_id = $1 AND token_balance >= $2
             RETURNING token_balance",
        )
        .bind(user_id)
        .bind(cost)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(token_balance) = token_balance else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO images (user_id, prompt, image_url, categories)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let image = sqlx::query_as::<_, Image>(&query)
            .bind(user_id)
            .bind(&input.prompt)
            .bind(&input.image_url)
            .bind(&input.categories)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(PaidCreation {
            image,
            token_balance,
        }))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM images WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// All images, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Image>(&query).fetch_all(pool).await
    }

    /// The `limit` newest images with their owner's username and avatar.
    pub async fn list_latest(pool: &PgPool, limit: i64) -> Result<Vec<ImageWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {OWNER_COLUMNS}
             FROM images i
             LEFT JOIN profiles p ON p.user_id = i.user_id
             ORDER BY i.created_at DESC, i.id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, ImageWithOwner>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// A user's creations, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
