//! Route definitions for images, likes and comments.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, images, likes};
use crate::state::AppState;

/// ```text
/// GET  /images                  -> list_images
/// POST /images                  -> create_image (requires auth)
/// GET  /images/latest           -> list_latest
/// GET  /images/{id}             -> get_image
/// GET  /images/{id}/like        -> like_status (requires auth)
/// POST /images/{id}/like        -> like_image (requires auth)
/// GET  /images/{id}/comments    -> list_comments
/// POST /images/{id}/comments    -> add_comment (requires auth)
/// GET  /users/{user_id}/images  -> list_user_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images", get(images::list_images).post(images::create_image))
        .route("/images/latest", get(images::list_latest))
        .route("/images/{id}", get(images::get_image))
        .route(
            "/images/{id}/like",
            get(likes::like_status).post(likes::like_image),
        )
        .route(
            "/images/{id}/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/users/{user_id}/images", get(images::list_user_images))
}
