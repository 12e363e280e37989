//! Repository for the `profiles` table, including the token balance.

use pictura_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpdateProfile};

const COLUMNS: &str = "id, user_id, username, full_name, avatar_url, bio, token_balance, \
                        created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`.
    ///
    /// Returns `None` if the user has no profile. A taken username fails
    /// with the `uq_profiles_username` constraint.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                username = COALESCE($2, username),
                full_name = COALESCE($3, full_name),
                bio = COALESCE($4, bio)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.username)
            .bind(&input.full_name)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_avatar_url(
        pool: &PgPool,
        user_id: DbId,
        avatar_url: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET avatar_url = $2 WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Current token balance, or `None` if the user has no profile.
    pub async fn token_balance(pool: &PgPool, user_id: DbId) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT token_balance FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically add `amount` tokens. Returns the new balance.
    pub async fn credit_tokens(
        pool: &PgPool,
        user_id: DbId,
        amount: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE profiles SET token_balance = token_balance + $2
             WHERE user_id = $1
             RETURNING token_balance",
        )
        .bind(user_id)
        .bind(amount)
        .fetch_optional(pool)
        .await
    }
}
