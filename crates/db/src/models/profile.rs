//! Public profile model and DTOs.

use pictura_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table. One per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub token_balance: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile fields visible to other users (no token balance).
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub user_id: DbId,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl From<Profile> for PublicProfile {
    fn from(p: Profile) -> Self {
        Self {
            user_id: p.user_id,
            username: p.username,
            full_name: p.full_name,
            avatar_url: p.avatar_url,
            bio: p.bio,
        }
    }
}

/// DTO for updating the caller's profile. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
}
