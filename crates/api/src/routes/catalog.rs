use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// ```text
/// GET /styles  -> list_styles
/// GET /models  -> list_models
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/styles", get(catalog::list_styles))
        .route("/models", get(catalog::list_models))
}
