//! Image comment model.

use pictura_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub image_id: DbId,
    pub user_id: DbId,
    pub author_name: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateComment {
    pub image_id: DbId,
    pub user_id: DbId,
    pub author_name: String,
    pub content: String,
}
