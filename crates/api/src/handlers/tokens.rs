//! Handlers for the caller's token balance and purchases.

use axum::extract::State;
use axum::Json;
use pictura_core::error::CoreError;
use pictura_core::tokens::find_package;
use pictura_db::repositories::ProfileRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ApiJson;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenBalance {
    pub token_balance: i32,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Token amount of the package to buy.
    pub amount: i32,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub purchased: i32,
    pub price_cents: i32,
    pub token_balance: i32,
}

/// GET /api/v1/tokens
pub async fn get_balance(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<TokenBalance>>> {
    let token_balance = ProfileRepo::token_balance(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: auth_user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: TokenBalance { token_balance },
    }))
}

/// POST /api/v1/tokens/purchase
///
/// Buy one of the fixed packages. Payment is simulated: the credit is
/// applied immediately.
pub async fn purchase(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(input): ApiJson<PurchaseRequest>,
) -> AppResult<Json<DataResponse<PurchaseResponse>>> {
    let package = find_package(input.amount)?;

    let token_balance = ProfileRepo::credit_tokens(&state.pool, auth_user.user_id, package.amount)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: auth_user.user_id,
        }))?;

    tracing::info!(
        user_id = auth_user.user_id,
        amount = package.amount,
        token_balance,
        "Tokens purchased",
    );

    Ok(Json(DataResponse {
        data: PurchaseResponse {
            purchased: package.amount,
            price_cents: package.price_cents,
            token_balance,
        },
    }))
}
