//! REST API client for the Replicate HTTP endpoints.
//!
//! Wraps prediction submission, status lookup and cancellation using
//! [`reqwest`]. Every request authenticates with `Authorization: Token <t>`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::poller::PredictionSource;
use crate::prediction::Prediction;

/// Public Replicate API base URL.
pub const DEFAULT_API_URL: &str = "https://api.replicate.com/v1";

/// Upper bound on a single request, so a stalled connection cannot hold a
/// poll open.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the Replicate API.
#[derive(Clone)]
pub struct ReplicateApi {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

/// Errors from the Replicate REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ReplicateApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Replicate returned a non-2xx status code.
    #[error("Replicate API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
        /// The `detail` field of a JSON error body, when present.
        detail: Option<String>,
    },
}

impl ReplicateApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base URL, e.g. `https://api.replicate.com/v1`.
    /// * `api_token` - Replicate API token.
    pub fn new(api_url: String, api_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_client(client, api_url, api_token)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, api_token: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    /// Submit a prediction against an official model.
    ///
    /// Sends `POST /models/{owner}/{name}/predictions` with `{"input": ...}`.
    /// With `prefer_wait` the request carries `Prefer: wait`, letting the
    /// vendor hold the response until the job finishes or its own wait
    /// window elapses; the returned prediction may then already be terminal.
    pub async fn create_model_prediction(
        &self,
        model: &str,
        input: &Value,
        prefer_wait: bool,
    ) -> Result<Prediction, ReplicateApiError> {
        let body = serde_json::json!({ "input": input });

        let mut request = self
            .client
            .post(format!("{}/models/{}/predictions", self.api_url, model))
            .header("Authorization", self.auth_header())
            .json(&body);
        if prefer_wait {
            request = request.header("Prefer", "wait");
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    /// Retrieve the current state of a prediction.
    ///
    /// Sends `GET /predictions/{id}`.
    pub async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateApiError> {
        let response = self
            .client
            .get(format!("{}/predictions/{}", self.api_url, id))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ask the vendor to stop a running prediction.
    ///
    /// Sends `POST /predictions/{id}/cancel`.
    pub async fn cancel_prediction(&self, id: &str) -> Result<(), ReplicateApiError> {
        let response = self
            .client
            .post(format!("{}/predictions/{}/cancel", self.api_url, id))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_token)
    }

    /// Ensure the response has a success status code. On failure the body
    /// is captured, and its JSON `detail` field extracted when present.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ReplicateApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let detail = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
                v.get("detail")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            return Err(ReplicateApiError::ApiError {
                status: status.as_u16(),
                body,
                detail,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ReplicateApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PredictionSource for ReplicateApi {
    async fn fetch(&self, id: &str) -> Result<Prediction, ReplicateApiError> {
        self.get_prediction(id).await
    }
}
