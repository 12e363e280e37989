//! Read-only catalogs: styles, text-to-image models, token packages.

use axum::Json;
use pictura_core::presets::{TextModel, TEXT_MODELS};
use pictura_core::styles::{Style, STYLES};
use pictura_core::tokens::{TokenPackage, TOKEN_PACKAGES};
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub key: TextModel,
    pub vendor_model: &'static str,
}

/// GET /api/v1/styles
pub async fn list_styles() -> Json<DataResponse<&'static [Style]>> {
    Json(DataResponse { data: STYLES })
}

/// GET /api/v1/models
pub async fn list_models() -> Json<DataResponse<Vec<ModelInfo>>> {
    let data = TEXT_MODELS
        .iter()
        .map(|&key| ModelInfo {
            key,
            vendor_model: key.vendor_model(),
        })
        .collect();
    Json(DataResponse { data })
}

/// GET /api/v1/tokens/packages
pub async fn list_token_packages() -> Json<DataResponse<&'static [TokenPackage]>> {
    Json(DataResponse {
        data: TOKEN_PACKAGES,
    })
}
