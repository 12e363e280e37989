//! Typed view of a Replicate prediction (generation job).

use serde::Deserialize;
use serde_json::Value;

/// Message surfaced when the vendor marks a job failed without saying why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Image generation failed";

/// Vendor-reported job status.
///
/// Only `succeeded` and `failed` carry meaning; every other label is kept
/// verbatim in [`PredictionStatus::Pending`] and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PredictionStatus {
    Succeeded,
    Failed,
    Pending(String),
}

impl From<String> for PredictionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            _ => Self::Pending(raw),
        }
    }
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Pending(label) => label,
        }
    }
}

/// A prediction as returned by submission and by status lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    /// Present once the job succeeded: a bare URL string or a list of URLs.
    #[serde(default)]
    pub output: Option<Value>,
    /// Present once the job failed. Usually a string.
    #[serde(default)]
    pub error: Option<Value>,
}

impl Prediction {
    /// Output normalized to a list of URLs.
    ///
    /// A bare string becomes a one-element list; a list keeps its string
    /// entries in order; anything else yields an empty list.
    pub fn output_urls(&self) -> Vec<String> {
        match &self.output {
            Some(Value::String(url)) => vec![url.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Vendor failure text, or [`GENERIC_FAILURE_MESSAGE`] when absent.
    pub fn failure_message(&self) -> String {
        match &self.error {
            Some(Value::String(msg)) if !msg.trim().is_empty() => msg.clone(),
            Some(Value::Null) | None => GENERIC_FAILURE_MESSAGE.to_string(),
            Some(Value::String(_)) => GENERIC_FAILURE_MESSAGE.to_string(),
            Some(other) => other.to_string(),
        }
    }
}
