//! Handlers for profiles: public lookup, the caller's own profile, avatar
//! upload and liked images.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use pictura_core::error::CoreError;
use pictura_core::types::DbId;
use pictura_db::models::profile::{Profile, PublicProfile, UpdateProfile};
use pictura_db::repositories::{LikeRepo, ProfileRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ApiJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Accepted avatar file extensions.
const AVATAR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];
const AVATAR_URL_PREFIX: &str = "/storage/avatars/";

/// Longest accepted username.
const MAX_USERNAME_CHARS: usize = 40;

/// GET /api/v1/profiles/{user_id}
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let profile = find_profile(&state, user_id).await?;
    Ok(Json(DataResponse {
        data: profile.into(),
    }))
}

/// GET /api/v1/profile
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = find_profile(&state, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Update username, full name and bio. Omitted fields are left unchanged.
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(mut input): ApiJson<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    if let Some(username) = input.username.as_mut() {
        *username = username.trim().to_string();
        if username.is_empty() || username.chars().count() > MAX_USERNAME_CHARS {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Username must be between 1 and {MAX_USERNAME_CHARS} characters"
            ))));
        }
    }

    let profile = ProfileRepo::update(&state.pool, auth_user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: auth_user.user_id,
        }))?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /api/v1/profile/avatar
///
/// Multipart form with a required `avatar` file field. The file is stored
/// under `<storage_dir>/avatars/` and served from `/storage/avatars/`. The
/// file it replaces is removed once the profile points at the new one.
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Profile>>> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("avatar") {
            let filename = field.file_name().unwrap_or("avatar").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) = file_data
        .filter(|(_, data)| !data.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required 'avatar' field".into()))?;

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !AVATAR_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported avatar format '.{ext}'. Supported: {}",
            AVATAR_EXTENSIONS.join(", ")
        )));
    }

    let avatar_dir = state.config.storage_dir.join("avatars");
    tokio::fs::create_dir_all(&avatar_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create avatar dir: {e}")))?;

    let stored_name = format!("{}-{}.{ext}", auth_user.user_id, uuid::Uuid::new_v4());
    tokio::fs::write(avatar_dir.join(&stored_name), &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write avatar: {e}")))?;

    let previous = ProfileRepo::find_by_user(&state.pool, auth_user.user_id)
        .await?
        .and_then(|p| p.avatar_url);

    let avatar_url = format!("{AVATAR_URL_PREFIX}{stored_name}");
    let profile = ProfileRepo::set_avatar_url(&state.pool, auth_user.user_id, &avatar_url)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: auth_user.user_id,
        }))?;

    if let Some(old_name) = previous.as_deref().and_then(stored_avatar_name) {
        if let Err(e) = tokio::fs::remove_file(avatar_dir.join(old_name)).await {
            tracing::warn!(
                user_id = auth_user.user_id,
                file = old_name,
                error = %e,
                "Failed to remove old avatar",
            );
        }
    }

    tracing::info!(user_id = auth_user.user_id, %avatar_url, "Avatar updated");
    Ok(Json(DataResponse { data: profile }))
}

/// File name of an avatar this server stored, or `None` for anything else
/// (external URLs, nested paths).
fn stored_avatar_name(url: &str) -> Option<&str> {
    url.strip_prefix(AVATAR_URL_PREFIX)
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
}

/// GET /api/v1/profile/likes
///
/// Ids of every image the caller liked, most recent first.
pub async fn list_liked_images(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    let ids = LikeRepo::liked_image_ids(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: ids }))
}

async fn find_profile(state: &AppState, user_id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_user(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user_id,
        }))
}
