use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Reddit Keyword Search Tool";
pub const REDDIT_AUTH_URL: &str = "https://www.reddit.com";
pub const REDDIT_API_URL: &str = "https://oauth.reddit.com";

pub const ENV_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const ENV_USER_AGENT: &str = "REDDIT_USER_AGENT";
pub const ENV_AUTH_URL: &str = "REDDIT_AUTH_URL";
pub const ENV_API_URL: &str = "REDDIT_API_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,
    /// Host serving `/api/v1/access_token`.
    pub reddit_auth_url: String,
    /// Host serving the OAuth listing endpoints.
    pub reddit_api_url: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reddit_client_id: None,
            reddit_client_secret: None,
            reddit_user_agent: DEFAULT_USER_AGENT.to_string(),
            reddit_auth_url: REDDIT_AUTH_URL.to_string(),
            reddit_api_url: REDDIT_API_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Builds the configuration from defaults, an optional TOML file and the
    /// process environment, in increasing order of precedence.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        if !config.has_reddit_credentials() {
            warn!(
                "{} / {} not set; searches will fail until credentials are provided",
                ENV_CLIENT_ID, ENV_CLIENT_SECRET
            );
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            debug!("Failed to read config file {}: {}", path.display(), e);
            ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overrides Reddit settings with any non-empty values returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(client_id) = lookup(ENV_CLIENT_ID) {
            self.reddit_client_id = Some(client_id);
        }
        if let Some(client_secret) = lookup(ENV_CLIENT_SECRET) {
            self.reddit_client_secret = Some(client_secret);
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            self.reddit_user_agent = user_agent;
        }
        if let Some(auth_url) = lookup(ENV_AUTH_URL) {
            self.reddit_auth_url = auth_url;
        }
        if let Some(api_url) = lookup(ENV_API_URL) {
            self.reddit_api_url = api_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("reddit_auth_url", &self.reddit_auth_url),
            ("reddit_api_url", &self.reddit_api_url),
        ] {
            Url::parse(value).map_err(|_| ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.clone(),
            })?;
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: self.port.to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: self.request_timeout_secs.to_string(),
            });
        }

        Ok(())
    }

    pub fn has_reddit_credentials(&self) -> bool {
        self.reddit_client_id.is_some() && self.reddit_client_secret.is_some()
    }
}
