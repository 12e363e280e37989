//! Handler for prompt enhancement.

use axum::extract::State;
use axum::Json;
use pictura_core::prompt::{enhancement_request, require_prompt, ENHANCE_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub enhanced_prompt: String,
}

/// POST /api/v1/enhance-prompt
///
/// Rewrites a prompt into a more vivid one of at most ~40 words.
pub async fn enhance_prompt(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EnhanceRequest>,
) -> AppResult<Json<EnhanceResponse>> {
    let prompt = require_prompt(input.prompt.as_deref(), "Prompt")?;
    let client = state
        .openai
        .as_ref()
        .ok_or(AppError::MissingApiKey("OPENAI_API_KEY"))?;

    let enhanced_prompt = client
        .complete(ENHANCE_SYSTEM_PROMPT, &enhancement_request(prompt))
        .await?;
    tracing::debug!(model = client.model(), "Prompt enhanced");

    Ok(Json(EnhanceResponse { enhanced_prompt }))
}
