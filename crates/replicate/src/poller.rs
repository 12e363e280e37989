//! Generation-job poller.
//!
//! A submitted prediction is re-read by id until the vendor reports
//! `succeeded` or `failed`. The wait between reads, its growth, an overall
//! deadline, an attempt cap and a [`CancellationToken`] are all supplied by
//! the caller through [`PollConfig`].
//!
//! With [`PollConfig::default`] the loop waits a fixed second between reads
//! and has no deadline: a job that never finishes is polled forever. Callers
//! that need a bound must set `timeout` or `max_attempts`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::ReplicateApiError;
use crate::prediction::{Prediction, PredictionStatus};

/// Anything that can re-read a prediction by id.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Prediction, ReplicateApiError>;
}

/// Tunable parameters for the poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wait before the first status read, and between reads.
    pub interval: Duration,
    /// Factor by which the wait grows after each non-terminal read.
    /// `1.0` keeps the interval fixed.
    pub backoff_multiplier: f64,
    /// Upper bound on the wait between reads.
    pub max_interval: Duration,
    /// Give up once this much time has passed since polling started.
    pub timeout: Option<Duration>,
    /// Give up after this many status reads.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            backoff_multiplier: 1.0,
            max_interval: Duration::from_secs(30),
            timeout: None,
            max_attempts: None,
        }
    }
}

impl PollConfig {
    /// Reject settings the poll loop cannot run with.
    ///
    /// A zero interval would issue status reads back to back with no wait.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.interval.is_zero() {
            return Err("poll interval must be greater than zero");
        }
        Ok(())
    }
}

/// Errors ending a poll without a successful prediction.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// A status read failed (network error or non-2xx). Polling stops.
    #[error("Failed to poll prediction {id}: {source}")]
    Fetch {
        id: String,
        #[source]
        source: ReplicateApiError,
    },

    /// The vendor reported `failed`; carries the vendor's message.
    #[error("{message}")]
    Failed { id: String, message: String },

    /// The deadline or attempt cap was reached first.
    #[error("Prediction {id} still '{last_status}' after {attempts} status checks ({elapsed:?})")]
    TimedOut {
        id: String,
        last_status: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// The cancellation token fired.
    #[error("Polling for prediction {id} was cancelled")]
    Cancelled { id: String },
}

impl PollError {
    /// Id of the prediction the poll was following.
    pub fn prediction_id(&self) -> &str {
        match self {
            Self::Fetch { id, .. }
            | Self::Failed { id, .. }
            | Self::TimedOut { id, .. }
            | Self::Cancelled { id } => id,
        }
    }
}

/// Calculate the next wait from the current wait and config.
///
/// The result is clamped to [`PollConfig::max_interval`] and never drops
/// below the current wait.
pub fn next_interval(current: Duration, config: &PollConfig) -> Duration {
    let multiplier = config.backoff_multiplier.max(1.0);
    let next_ms = (current.as_millis() as f64 * multiplier) as u64;
    Duration::from_millis(next_ms)
        .min(config.max_interval)
        .max(current.min(config.max_interval))
}

/// Follow `initial` until it reaches a terminal status.
///
/// Returns the succeeded prediction, or a [`PollError`] when the vendor
/// reports failure, a status read fails, the configured bound is hit, or
/// `cancel` fires. A prediction that is already terminal is returned (or
/// failed) without any status read.
///
/// The `timeout` is a hard deadline: it cuts short both the wait between
/// reads and a status read that is still in flight.
pub async fn poll_until_terminal<S>(
    source: &S,
    initial: Prediction,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<Prediction, PollError>
where
    S: PredictionSource + ?Sized,
{
    let started = Instant::now();
    let deadline = config.timeout.map(|t| started + t);
    let mut prediction = initial;
    let mut delay = config.interval;
    let mut attempts = 0u32;

    loop {
        match prediction.status {
            PredictionStatus::Succeeded => {
                tracing::info!(
                    prediction_id = %prediction.id,
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Prediction succeeded",
                );
                return Ok(prediction);
            }
            PredictionStatus::Failed => {
                let message = prediction.failure_message();
                tracing::warn!(
                    prediction_id = %prediction.id,
                    attempts,
                    error = %message,
                    "Prediction failed",
                );
                return Err(PollError::Failed {
                    id: prediction.id,
                    message,
                });
            }
            PredictionStatus::Pending(_) => {}
        }

        let out_of_attempts = config.max_attempts.is_some_and(|max| attempts >= max);
        if out_of_attempts || past(deadline) {
            return Err(timed_out(prediction, attempts, started));
        }

        // Wait before the next read, never beyond the deadline.
        let wake = match deadline {
            Some(deadline) => (Instant::now() + delay).min(deadline),
            None => Instant::now() + delay,
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(prediction)),
            _ = tokio::time::sleep_until(wake) => {}
        }
        if past(deadline) {
            return Err(timed_out(prediction, attempts, started));
        }

        attempts += 1;
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            _ = sleep_until_deadline(deadline) => Some(None),
            result = source.fetch(&prediction.id) => Some(Some(result)),
        };
        let fetched = match fetched {
            None => return Err(cancelled(prediction)),
            Some(None) => return Err(timed_out(prediction, attempts, started)),
            Some(Some(result)) => result,
        };

        prediction = fetched.map_err(|source| {
            tracing::error!(
                prediction_id = %prediction.id,
                attempt = attempts,
                error = %source,
                "Prediction status check failed",
            );
            PollError::Fetch {
                id: prediction.id.clone(),
                source,
            }
        })?;

        tracing::debug!(
            prediction_id = %prediction.id,
            attempt = attempts,
            status = prediction.status.as_str(),
            "Polled prediction status",
        );

        delay = next_interval(delay, config);
    }
}

fn past(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

/// Resolves at `deadline`, or never when there is none.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn timed_out(prediction: Prediction, attempts: u32, started: Instant) -> PollError {
    tracing::warn!(
        prediction_id = %prediction.id,
        attempts,
        status = prediction.status.as_str(),
        "Prediction polling limit reached",
    );
    PollError::TimedOut {
        last_status: prediction.status.as_str().to_string(),
        id: prediction.id,
        attempts,
        elapsed: started.elapsed(),
    }
}

fn cancelled(prediction: Prediction) -> PollError {
    tracing::info!(prediction_id = %prediction.id, "Prediction polling cancelled");
    PollError::Cancelled { id: prediction.id }
}
