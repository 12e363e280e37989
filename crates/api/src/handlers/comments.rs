//! Handlers for image comments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pictura_core::error::CoreError;
use pictura_core::types::DbId;
use pictura_db::models::comment::{Comment, CreateComment};
use pictura_db::repositories::{CommentRepo, ImageRepo, ProfileRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ApiJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 2000;

/// Author name used when the commenter has not set a username.
const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// GET /api/v1/images/{id}/comments
///
/// Newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(image_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    ensure_image_exists(&state, image_id).await?;
    let comments = CommentRepo::list_for_image(&state.pool, image_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/images/{id}/comments
///
/// The author name is the caller's username at posting time.
pub async fn add_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(image_id): Path<DbId>,
    ApiJson(input): ApiJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let content = input.content.trim();
    if content.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Comment cannot be empty".into(),
        )));
    }
    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_CHARS} characters"
        ))));
    }

    ensure_image_exists(&state, image_id).await?;

    let author_name = ProfileRepo::find_by_user(&state.pool, auth_user.user_id)
        .await?
        .and_then(|p| p.username)
        .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            image_id,
            user_id: auth_user.user_id,
            author_name,
            content: content.to_string(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

async fn ensure_image_exists(state: &AppState, image_id: DbId) -> AppResult<()> {
    if !ImageRepo::exists(&state.pool, image_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id: image_id,
        }));
    }
    Ok(())
}
