//! Handlers for image likes.

use axum::extract::{Path, State};
use axum::Json;
use pictura_core::error::CoreError;
use pictura_core::types::DbId;
use pictura_db::repositories::{ImageRepo, LikeRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub number_of_likes: i32,
}

/// GET /api/v1/images/{id}/like
///
/// Whether the caller likes the image, and its like count.
pub async fn like_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(image_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeStatus>>> {
    let image = ImageRepo::find_by_id(&state.pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id: image_id,
        }))?;
    let liked = LikeRepo::has_liked(&state.pool, auth_user.user_id, image_id).await?;

    Ok(Json(DataResponse {
        data: LikeStatus {
            liked,
            number_of_likes: image.number_of_likes,
        },
    }))
}

/// POST /api/v1/images/{id}/like
///
/// Like an image. Repeating the call is a no-op.
pub async fn like_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(image_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LikeStatus>>> {
    let number_of_likes = LikeRepo::like(&state.pool, auth_user.user_id, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id: image_id,
        }))?;

    Ok(Json(DataResponse {
        data: LikeStatus {
            liked: true,
            number_of_likes,
        },
    }))
}
