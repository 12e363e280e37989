//! Replicate REST client and generation-job poller.
//!
//! Provides typed prediction parsing, HTTP API wrappers for submission,
//! status lookup and cancellation, and a single parameterized poll loop
//! shared by every generation endpoint.

pub mod api;
pub mod poller;
pub mod prediction;

pub use api::{ReplicateApi, ReplicateApiError};
pub use poller::{poll_until_terminal, PollConfig, PollError, PredictionSource};
pub use prediction::{Prediction, PredictionStatus};
