//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated caller, from a JWT Bearer token.
//! - [`json::ApiJson`] -- a JSON body whose rejections use the API error shape.

pub mod auth;
pub mod json;
