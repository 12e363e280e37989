//! Repository for the `comments` table.

use pictura_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

const COLUMNS: &str = "id, image_id, user_id, author_name, content, created_at, updated_at";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (image_id, user_id, author_name, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.image_id)
            .bind(input.user_id)
            .bind(&input.author_name)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Comments on an image, newest first.
    pub async fn list_for_image(pool: &PgPool, image_id: DbId) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE image_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(image_id)
            .fetch_all(pool)
            .await
    }
}
