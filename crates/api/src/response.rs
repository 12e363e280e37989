//! Shared response envelope types for API handlers.
//!
//! Resource endpoints answer with a `{ "data": ... }` envelope. The
//! generation endpoints keep their flat `{ "imageUrl": ... }` and
//! `{ "enhancedPrompt": ... }` shapes, which web clients read directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
