//! Handlers for the image-generation endpoints.
//!
//! Every endpoint validates its input first, then checks the vendor
//! credential, submits one prediction and waits on the shared poller. No
//! vendor call is made for an invalid request.

use axum::extract::{Multipart, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use pictura_core::error::CoreError;
use pictura_core::presets::{build_input, image_data_uri, ImagePreset, TextModel};
use pictura_core::prompt::{
    furniture_prompt, join_with_styles, require_prompt, with_style_fragments,
};
use pictura_core::styles::resolve_styles;
use pictura_replicate::{poll_until_terminal, PollError, ReplicateApi};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::json::ApiJson;
use crate::state::AppState;

/// Largest accepted upload for the image-to-image endpoints.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub model: Option<String>,
    /// Style catalog keys whose prompt fragments are appended.
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Response of every generation endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Output URLs, always a list even when the vendor returned one string.
    pub image_url: Vec<String>,
}

/// An uploaded source image.
struct Upload {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

impl Upload {
    fn data_uri(&self) -> String {
        image_data_uri(self.content_type.as_deref(), &BASE64.encode(&self.bytes))
    }
}

/// Fields shared by the multipart generation forms.
#[derive(Default)]
struct GenerationForm {
    image: Option<Upload>,
    prompt: Option<String>,
    styles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/generate
///
/// Text-to-image with one of the fixed model presets.
pub async fn generate(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<GenerateRequest>,
) -> AppResult<Json<GenerationResponse>> {
    let prompt = require_prompt(input.prompt.as_deref(), "Prompt")?;
    let model_key = input
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| CoreError::Validation("Model is required".into()))?;
    let model = TextModel::parse(model_key)?;
    let styles = resolve_styles(&input.styles)?;

    let api = replicate_client(&state)?;
    let prompt = with_style_fragments(prompt, &styles);
    let vendor_input = build_input(model.defaults(), &prompt, None);

    let image_url = run_prediction(&state, api, model.vendor_model(), &vendor_input, false).await?;
    Ok(Json(GenerationResponse { image_url }))
}

/// POST /api/v1/generate-image-to-image
///
/// Multipart: `image` (required), `prompt` (optional), `styles` (repeatable,
/// free text). The prompt sent is `[prompt, ...styles].join(", ")`.
pub async fn generate_image_to_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<GenerationResponse>> {
    let form = read_form(multipart).await?;
    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest("Image is required".into()))?;
    let prompt = join_with_styles(form.prompt.as_deref().unwrap_or_default(), &form.styles);

    let preset = ImagePreset::GenerateImageToImage;
    submit_image_preset(&state, preset, &prompt, &image).await
}

/// POST /api/v1/image-to-image
///
/// Multipart: `image` and `prompt`, both required.
pub async fn image_to_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<GenerationResponse>> {
    let form = read_form(multipart).await?;
    let (image, prompt) = require_image_and_prompt(&form)?;

    submit_image_preset(&state, ImagePreset::ImageToImage, prompt, image).await
}

/// POST /api/v1/transform-furniture
///
/// Multipart: `image` (a room photo) and `prompt` (a style name), both
/// required. The style is wrapped in the room-transformation instruction.
pub async fn transform_furniture(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<GenerationResponse>> {
    let form = read_form(multipart).await?;
    let (image, style) = require_image_and_prompt(&form)?;
    let prompt = furniture_prompt(style);

    submit_image_preset(&state, ImagePreset::TransformFurniture, &prompt, image).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn replicate_client(state: &AppState) -> AppResult<&ReplicateApi> {
    state
        .replicate
        .as_ref()
        .ok_or(AppError::MissingApiKey("REPLICATE_API_TOKEN"))
}

fn require_image_and_prompt(form: &GenerationForm) -> AppResult<(&Upload, &str)> {
    let image = form.image.as_ref();
    let prompt = form
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    match (image, prompt) {
        (Some(image), Some(prompt)) => {
            let prompt = require_prompt(Some(prompt), "Prompt")?;
            Ok((image, prompt))
        }
        _ => Err(AppError::BadRequest(
            "Image and prompt are required".into(),
        )),
    }
}

async fn submit_image_preset(
    state: &AppState,
    preset: ImagePreset,
    prompt: &str,
    image: &Upload,
) -> AppResult<Json<GenerationResponse>> {
    let api = replicate_client(state)?;
    let data_uri = image.data_uri();
    let vendor_input = build_input(preset.defaults(), prompt, Some(&data_uri));

    let image_url = run_prediction(
        state,
        api,
        preset.vendor_model(),
        &vendor_input,
        preset.prefer_wait(),
    )
    .await?;
    Ok(Json(GenerationResponse { image_url }))
}

/// Submit one prediction and wait for it on the shared poller.
///
/// A job abandoned by timeout or shutdown gets a best-effort vendor-side
/// cancel; a failure to cancel is logged and otherwise ignored.
async fn run_prediction(
    state: &AppState,
    api: &ReplicateApi,
    model: &str,
    input: &Value,
    prefer_wait: bool,
) -> AppResult<Vec<String>> {
    let submitted = api.create_model_prediction(model, input, prefer_wait).await?;
    tracing::info!(
        prediction_id = %submitted.id,
        model,
        status = submitted.status.as_str(),
        "Prediction submitted",
    );

    let cancel = state.shutdown.child_token();
    match poll_until_terminal(api, submitted, &state.config.replicate.poll, &cancel).await {
        Ok(done) => Ok(done.output_urls()),
        Err(err) => {
            if matches!(err, PollError::TimedOut { .. } | PollError::Cancelled { .. }) {
                if let Err(cancel_err) = api.cancel_prediction(err.prediction_id()).await {
                    tracing::warn!(
                        prediction_id = %err.prediction_id(),
                        error = %cancel_err,
                        "Failed to cancel abandoned prediction",
                    );
                }
            }
            Err(err.into())
        }
    }
}

/// Collect `image`, `prompt` and `styles` fields; anything else is ignored.
async fn read_form(mut multipart: Multipart) -> AppResult<GenerationForm> {
    let mut form = GenerationForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !bytes.is_empty() {
                    form.image = Some(Upload {
                        bytes: bytes.to_vec(),
                        content_type,
                    });
                }
            }
            "prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.prompt = Some(text);
            }
            "styles" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.styles.push(text);
            }
            _ => {}
        }
    }

    Ok(form)
}
