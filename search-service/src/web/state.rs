//! Shared application state

use reddit_client::{RedditClient, RedditOAuth2Config};
use search_core::{AppConfig, CoreError};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Builds an unauthenticated Reddit client. Each request gets its own.
    pub fn reddit_client(&self) -> Result<RedditClient, CoreError> {
        RedditClient::new(RedditOAuth2Config::from(self.config.as_ref()))
    }
}
