//! Fixed generation presets for every vendor model the service exposes.
//!
//! Callers choose a model key (text-to-image) or hit an image-to-image
//! endpoint; the vendor input is the preset merged with the caller's prompt
//! (and uploaded image). Presets are never caller-editable.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::CoreError;

/// Vendor model used by every image-to-image preset.
pub const FLUX_DEV_MODEL: &str = "black-forest-labs/flux-dev";

/// Negative prompt shared by the room-oriented image-to-image presets.
pub const ARCHITECTURE_NEGATIVE_PROMPT: &str = "blurry, low quality, distorted layout, \
     wrong perspective, bad architecture, ugly, deformed, disfigured, watermark, text, signature";

/// Shorter negative prompt used by the plain image-to-image preset.
pub const IMAGE_TO_IMAGE_NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted layout, wrong perspective, bad architecture";

// ---------------------------------------------------------------------------
// Text-to-image models
// ---------------------------------------------------------------------------

/// Text-to-image model keys accepted by `POST /generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextModel {
    Schnell,
    Flux,
    Pro,
    Lightning,
}

/// All text-to-image models, in display order.
pub const TEXT_MODELS: &[TextModel] = &[
    TextModel::Schnell,
    TextModel::Flux,
    TextModel::Pro,
    TextModel::Lightning,
];

impl TextModel {
    /// Parse a caller-supplied model key (case-insensitive, trimmed).
    pub fn parse(key: &str) -> Result<Self, CoreError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "schnell" => Ok(Self::Schnell),
            "flux" => Ok(Self::Flux),
            "pro" => Ok(Self::Pro),
            "lightning" => Ok(Self::Lightning),
            other => Err(CoreError::Validation(format!(
                "Unknown model '{other}'. Must be one of: {}",
                TEXT_MODELS
                    .iter()
                    .map(|m| m.key())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Schnell => "schnell",
            Self::Flux => "flux",
            Self::Pro => "pro",
            Self::Lightning => "lightning",
        }
    }

    /// `owner/name` path of the vendor model.
    pub fn vendor_model(self) -> &'static str {
        match self {
            Self::Schnell => "black-forest-labs/flux-schnell",
            Self::Flux => FLUX_DEV_MODEL,
            Self::Pro => "black-forest-labs/flux-1.1-pro",
            Self::Lightning => "bytedance/sdxl-lightning-4step",
        }
    }

    /// Fixed vendor inputs for this model, without the prompt.
    pub fn defaults(self) -> Map<String, Value> {
        let value = match self {
            Self::Flux => json!({
                "go_fast": true,
                "megapixels": "1",
                "num_outputs": 1,
                "aspect_ratio": "1:1",
                "output_format": "webp",
                "output_quality": 80,
                "num_inference_steps": 30,
            }),
            Self::Pro => json!({
                "num_outputs": 1,
                "scheduler": "K_EULER",
                "num_inference_steps": 50,
                "guidance_scale": 7.5,
                "width": 1024,
                "height": 1024,
            }),
            Self::Schnell => json!({
                "go_fast": true,
                "megapixels": "1",
                "num_outputs": 1,
                "aspect_ratio": "1:1",
                "output_format": "webp",
                "output_quality": 80,
                "num_inference_steps": 4,
            }),
            Self::Lightning => json!({
                "prompt_strength": 7.5,
                "num_inference_steps": 4,
                "width": 1024,
                "height": 1024,
                "refine": "expert_ensemble_refiner",
                "scheduler": "K_EULER",
                "guidance_scale": 7.5,
                "apply_watermark": false,
                "high_noise_frac": 0.8,
                "negative_prompt": "",
            }),
        };
        into_map(value)
    }
}

// ---------------------------------------------------------------------------
// Image-to-image presets
// ---------------------------------------------------------------------------

/// One preset per image-to-image endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePreset {
    /// `POST /generate-image-to-image` (prompt optional, styles appended).
    GenerateImageToImage,
    /// `POST /image-to-image`.
    ImageToImage,
    /// `POST /transform-furniture` (prompt is a style name).
    TransformFurniture,
}

impl ImagePreset {
    pub fn vendor_model(self) -> &'static str {
        FLUX_DEV_MODEL
    }

    /// Whether the submission asks the vendor to hold the response open
    /// (`Prefer: wait`) before falling back to polling.
    pub fn prefer_wait(self) -> bool {
        matches!(self, Self::GenerateImageToImage | Self::TransformFurniture)
    }

    /// Fixed vendor inputs for this preset, without prompt and image.
    pub fn defaults(self) -> Map<String, Value> {
        let value = match self {
            Self::GenerateImageToImage => json!({
                "num_inference_steps": 28,
                "num_outputs": 1,
                "guidance_scale": 3.5,
                "output_format": "jpg",
                "prompt_strength": 0.8,
                "output_quality": 80,
                "negative_prompt": ARCHITECTURE_NEGATIVE_PROMPT,
            }),
            Self::ImageToImage => json!({
                "go_fast": false,
                "guidance": 7.5,
                "megapixels": "1",
                "num_outputs": 1,
                "aspect_ratio": "1:1",
                "output_format": "webp",
                "output_quality": 90,
                "prompt_strength": 0.63,
                "num_inference_steps": 40,
                "negative_prompt": IMAGE_TO_IMAGE_NEGATIVE_PROMPT,
            }),
            Self::TransformFurniture => json!({
                "num_inference_steps": 35,
                "num_outputs": 1,
                "guidance_scale": 3,
                "output_format": "jpg",
                "prompt_strength": 0.7,
                "output_quality": 90,
                "negative_prompt": ARCHITECTURE_NEGATIVE_PROMPT,
            }),
        };
        into_map(value)
    }
}

// ---------------------------------------------------------------------------
// Input assembly
// ---------------------------------------------------------------------------

/// Merge a preset with the caller's prompt and optional image data URI.
///
/// `prompt` and `image` are inserted after the preset so they always win
/// over a preset key of the same name.
pub fn build_input(mut defaults: Map<String, Value>, prompt: &str, image: Option<&str>) -> Value {
    if let Some(image) = image {
        defaults.insert("image".into(), Value::String(image.to_string()));
    }
    defaults.insert("prompt".into(), Value::String(prompt.to_string()));
    Value::Object(defaults)
}

/// Encode raw upload bytes (already base64-encoded) as a data URI.
///
/// Falls back to `image/jpeg` when the upload carried no usable mime type.
pub fn image_data_uri(content_type: Option<&str>, base64_payload: &str) -> String {
    let mime = content_type
        .map(str::trim)
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or("image/jpeg");
    format!("data:{mime};base64,{base64_payload}")
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_accepts_known_keys_case_insensitively() {
        assert_eq!(TextModel::parse("schnell").unwrap(), TextModel::Schnell);
        assert_eq!(TextModel::parse(" FLUX ").unwrap(), TextModel::Flux);
        assert_eq!(TextModel::parse("Lightning").unwrap(), TextModel::Lightning);
    }

    #[test]
    fn parse_rejects_unknown_key() {
        let err = TextModel::parse("dalle").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("dalle"));
    }

    #[test]
    fn every_model_has_a_vendor_path_and_defaults() {
        for model in TEXT_MODELS {
            assert!(model.vendor_model().contains('/'));
            assert!(!model.defaults().is_empty());
            assert_eq!(TextModel::parse(model.key()).unwrap(), *model);
        }
    }

    #[test]
    fn schnell_uses_four_steps() {
        let defaults = TextModel::Schnell.defaults();
        assert_eq!(defaults["num_inference_steps"], 4);
        assert_eq!(defaults["output_format"], "webp");
    }

    #[test]
    fn build_input_places_prompt_over_preset() {
        let input = build_input(TextModel::Lightning.defaults(), "a red fox", None);
        assert_eq!(input["prompt"], "a red fox");
        assert_eq!(input["negative_prompt"], "");
        assert!(input.get("image").is_none());
    }

    #[test]
    fn build_input_includes_image() {
        let input = build_input(
            ImagePreset::ImageToImage.defaults(),
            "cozy",
            Some("data:image/png;base64,AAAA"),
        );
        assert_eq!(input["image"], "data:image/png;base64,AAAA");
        assert_eq!(input["prompt_strength"], 0.63);
    }

    #[test]
    fn prefer_wait_only_for_room_presets() {
        assert!(ImagePreset::GenerateImageToImage.prefer_wait());
        assert!(ImagePreset::TransformFurniture.prefer_wait());
        assert!(!ImagePreset::ImageToImage.prefer_wait());
    }

    #[test]
    fn data_uri_defaults_to_jpeg() {
        assert_eq!(image_data_uri(None, "QUJD"), "data:image/jpeg;base64,QUJD");
        assert_eq!(
            image_data_uri(Some("application/octet-stream"), "QUJD"),
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(
            image_data_uri(Some("image/png"), "QUJD"),
            "data:image/png;base64,QUJD"
        );
    }
}
