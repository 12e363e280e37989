use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{generation::MAX_UPLOAD_BYTES, profile};
use crate::state::AppState;

/// ```text
/// GET  /profiles/{user_id}  -> get_public_profile
/// GET  /profile             -> get_own_profile (requires auth)
/// PUT  /profile             -> update_own_profile (requires auth)
/// POST /profile/avatar      -> upload_avatar (requires auth)
/// GET  /profile/likes       -> list_liked_images (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profiles/{user_id}", get(profile::get_public_profile))
        .route(
            "/profile",
            get(profile::get_own_profile).put(profile::update_own_profile),
        )
        .route(
            "/profile/avatar",
            post(profile::upload_avatar).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/profile/likes", get(profile::list_liked_images))
}
