//! Saved creation model and DTOs.

use pictura_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub image_url: String,
    pub categories: Vec<String>,
    pub number_of_likes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An image joined with a summary of its owner's profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageWithOwner {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub image_url: String,
    pub categories: Vec<String>,
    pub number_of_likes: i32,
    pub created_at: Timestamp,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

/// DTO for recording a creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImage {
    pub prompt: String,
    pub image_url: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Result of a paid insert: the new row and the owner's remaining balance.
#[derive(Debug, Clone, Serialize)]
pub struct PaidCreation {
    pub image: Image,
    pub token_balance: i32,
}
