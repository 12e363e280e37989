//! Refresh sessions: one per issued refresh token.

use pictura_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A refresh session as read back from `refresh_sessions`.
///
/// The token hash never leaves the database layer.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub user_agent: Option<String>,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A refresh token about to be issued.
#[derive(Debug)]
pub struct NewRefreshSession<'a> {
    pub user_id: DbId,
    pub token_hash: &'a str,
    pub user_agent: Option<&'a str>,
    pub expires_at: Timestamp,
}
