//! Route definitions for the generation endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::{enhance, generation};
use crate::state::AppState;

/// ```text
/// POST /generate                  -> generate
/// POST /generate-image-to-image   -> generate_image_to_image
/// POST /image-to-image            -> image_to_image
/// POST /transform-furniture       -> transform_furniture
/// POST /enhance-prompt            -> enhance_prompt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generation::generate))
        .route(
            "/generate-image-to-image",
            post(generation::generate_image_to_image),
        )
        .route("/image-to-image", post(generation::image_to_image))
        .route("/transform-furniture", post(generation::transform_furniture))
        .layer(DefaultBodyLimit::max(generation::MAX_UPLOAD_BYTES))
        .route("/enhance-prompt", post(enhance::enhance_prompt))
}
