use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{catalog, tokens};
use crate::state::AppState;

/// Routes mounted at `/tokens`.
///
/// ```text
/// GET  /           -> get_balance (requires auth)
/// GET  /packages   -> list_token_packages
/// POST /purchase   -> purchase (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tokens::get_balance))
        .route("/packages", get(catalog::list_token_packages))
        .route("/purchase", post(tokens::purchase))
}
