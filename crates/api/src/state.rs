use std::sync::Arc;

use pictura_openai::{ChatClient, ChatConfig};
use pictura_replicate::ReplicateApi;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the pool, the vendor clients and the token are all
/// reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    pub pool: pictura_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// `None` when `REPLICATE_API_TOKEN` is unset.
    pub replicate: Option<ReplicateApi>,
    /// `None` when `OPENAI_API_KEY` is unset.
    pub openai: Option<ChatClient>,
    /// Cancelled on graceful shutdown; aborts every in-flight poll.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build state and the vendor clients the config has credentials for.
    pub fn new(pool: pictura_db::DbPool, config: ServerConfig) -> Self {
        let replicate = config.replicate.api_token.as_ref().map(|token| {
            ReplicateApi::new(config.replicate.api_url.clone(), token.clone())
        });

        let openai = config.openai.api_key.as_ref().map(|key| {
            ChatClient::new(ChatConfig {
                api_url: config.openai.api_url.clone(),
                model: config.openai.model.clone(),
                ..ChatConfig::new(key.clone())
            })
        });

        Self {
            pool,
            config: Arc::new(config),
            replicate,
            openai,
            shutdown: CancellationToken::new(),
        }
    }
}
