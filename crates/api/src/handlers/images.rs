//! Handlers for saved creations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pictura_core::error::CoreError;
use pictura_core::tokens::GENERATION_COST;
use pictura_core::types::DbId;
use pictura_db::models::image::{CreateImage, Image, ImageWithOwner, PaidCreation};
use pictura_db::repositories::{ImageRepo, ProfileRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ApiJson;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LATEST_LIMIT: i64 = 10;
const MAX_LATEST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct LatestParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/images
///
/// The full gallery, newest first.
pub async fn list_images(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Image>>>> {
    let images = ImageRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: images }))
}

/// GET /api/v1/images/latest?limit=
///
/// Newest creations with their owner's username and avatar. `limit`
/// defaults to 10 and is clamped to 1..=100.
pub async fn list_latest(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> AppResult<Json<DataResponse<Vec<ImageWithOwner>>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LATEST_LIMIT)
        .clamp(1, MAX_LATEST_LIMIT);
    let images = ImageRepo::list_latest(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: images }))
}

/// GET /api/v1/images/{id}
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Image>>> {
    let image = ImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id,
        }))?;
    Ok(Json(DataResponse { data: image }))
}

/// GET /api/v1/users/{user_id}/images
pub async fn list_user_images(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Image>>>> {
    let images = ImageRepo::list_by_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: images }))
}

/// POST /api/v1/images
///
/// Record a generated image as the caller's creation. Costs one token,
/// debited atomically with the insert; 409 when the balance is too low.
pub async fn create_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(mut input): ApiJson<CreateImage>,
) -> AppResult<(StatusCode, Json<DataResponse<PaidCreation>>)> {
    input.prompt = input.prompt.trim().to_string();
    input.image_url = input.image_url.trim().to_string();
    if input.prompt.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "prompt is required".into(),
        )));
    }
    if input.image_url.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "image_url is required".into(),
        )));
    }

    let paid = ImageRepo::create_paid(&state.pool, auth_user.user_id, &input, GENERATION_COST)
        .await?;

    match paid {
        Some(paid) => {
            tracing::info!(
                user_id = auth_user.user_id,
                image_id = paid.image.id,
                token_balance = paid.token_balance,
                "Creation recorded",
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: paid })))
        }
        None => {
            let available = ProfileRepo::token_balance(&state.pool, auth_user.user_id)
                .await?
                .unwrap_or(0);
            Err(AppError::Core(CoreError::InsufficientTokens {
                required: GENERATION_COST,
                available,
            }))
        }
    }
}
