//! Chat-completions client used for prompt enhancement.

pub mod chat;

pub use chat::{ChatClient, ChatConfig, OpenAiError};
