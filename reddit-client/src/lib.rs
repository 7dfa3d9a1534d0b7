pub mod api;


use api::{RedditApiClient, RedditPostData};
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl};
use search_core::{
    AppConfig, ConfigError, CoreError, RedditApiError, DEFAULT_USER_AGENT, ENV_CLIENT_ID,
    ENV_CLIENT_SECRET, REDDIT_API_URL, REDDIT_AUTH_URL,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info};

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct RedditOAuth2Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: String,
    pub auth_url: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl RedditOAuth2Config {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client_id: Some(client_id),
            client_secret: Some(client_secret),
            user_agent,
            auth_url: REDDIT_AUTH_URL.to_string(),
            api_url: REDDIT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Points the client at different token and API hosts.
    pub fn with_endpoints(mut self, auth_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self.api_url = api_url.into();
        self
    }
}

impl From<&AppConfig> for RedditOAuth2Config {
    fn from(config: &AppConfig) -> Self {
        let user_agent = if config.reddit_user_agent.is_empty() {
            DEFAULT_USER_AGENT.to_string()
        } else {
            config.reddit_user_agent.clone()
        };

        Self {
            client_id: config.reddit_client_id.clone(),
            client_secret: config.reddit_client_secret.clone(),
            user_agent,
            auth_url: config.reddit_auth_url.clone(),
            api_url: config.reddit_api_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditToken {
    pub access_token: String,
    pub expires_at: SystemTime,
    pub scope: Vec<String>,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub enum AuthState {
    NotAuthenticated,
    Authenticated { expires_at: SystemTime },
    TokenExpired { expired_at: SystemTime },
}

/// Application-only Reddit client.
///
/// Creating a client performs no network I/O. The client-credentials grant is
/// requested on the first API call and the token is reused until it expires.
#[derive(Debug)]
pub struct RedditClient {
    config: RedditOAuth2Config,
    api: RedditApiClient,
    token: Option<RedditToken>,
    auth_state: AuthState,
}

impl RedditClient {
    pub fn new(config: RedditOAuth2Config) -> Result<Self, CoreError> {
        let api = RedditApiClient::new(
            config.api_url.clone(),
            config.user_agent.clone(),
            config.timeout,
        )?;

        Ok(Self {
            config,
            api,
            token: None,
            auth_state: AuthState::NotAuthenticated,
        })
    }

    pub fn config(&self) -> &RedditOAuth2Config {
        &self.config
    }

    pub fn get_auth_state(&self) -> &AuthState {
        &self.auth_state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth_state, AuthState::Authenticated { .. })
            && self.token.as_ref().is_some_and(|token| !token.is_expired())
    }

    pub fn set_token(&mut self, token: RedditToken) {
        self.auth_state = if token.is_expired() {
            AuthState::TokenExpired {
                expired_at: token.expires_at,
            }
        } else {
            AuthState::Authenticated {
                expires_at: token.expires_at,
            }
        };
        self.token = Some(token);
    }

    /// Returns a valid access token, authenticating first when needed.
    pub async fn ensure_authenticated(&mut self) -> Result<String, CoreError> {
        if let Some(token) = self.token.as_ref().filter(|token| !token.is_expired()) {
            return Ok(token.access_token.clone());
        }

        if let Some(token) = &self.token {
            debug!("Access token expired at {:?}, re-authenticating", token.expires_at);
            self.auth_state = AuthState::TokenExpired {
                expired_at: token.expires_at,
            };
        }

        let token = self.authenticate().await?;
        let access_token = token.access_token.clone();
        self.set_token(token);
        Ok(access_token)
    }

    async fn authenticate(&self) -> Result<RedditToken, CoreError> {
        let client_id = self.config.client_id.clone().ok_or_else(|| {
            ConfigError::MissingEnvironmentVariable {
                var_name: ENV_CLIENT_ID.to_string(),
            }
        })?;
        let client_secret = self.config.client_secret.clone().ok_or_else(|| {
            ConfigError::MissingEnvironmentVariable {
                var_name: ENV_CLIENT_SECRET.to_string(),
            }
        })?;

        let auth_base = self.config.auth_url.trim_end_matches('/');
        let invalid_auth_url = |_| ConfigError::InvalidValue {
            field: "reddit_auth_url".to_string(),
            value: self.config.auth_url.clone(),
        };
        let auth_url =
            AuthUrl::new(format!("{}/api/v1/authorize", auth_base)).map_err(invalid_auth_url)?;
        let token_url =
            TokenUrl::new(format!("{}/api/v1/access_token", auth_base)).map_err(invalid_auth_url)?;

        let oauth_client = BasicClient::new(
            ClientId::new(client_id),
            Some(ClientSecret::new(client_secret)),
            auth_url,
            Some(token_url),
        );

        info!("Authenticating with Reddit using application credentials");
        let response = oauth_client
            .exchange_client_credentials()
            .request_async(|request| self.api.send_oauth_request(request))
            .await
            .map_err(|e| {
                error!("Reddit token request failed: {}", e);
                CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                    reason: e.to_string(),
                })
            })?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let scope = response
            .scopes()
            .map(|scopes| scopes.iter().map(|scope| scope.to_string()).collect())
            .unwrap_or_default();

        debug!("Obtained Reddit access token valid for {:?}", lifetime);
        Ok(RedditToken {
            access_token: response.access_token().secret().clone(),
            expires_at: SystemTime::now() + lifetime,
            scope,
        })
    }

    /// Fetches up to `limit` posts from the subreddit's hot listing, in listing order.
    pub async fn fetch_hot_posts(
        &mut self,
        subreddit: &str,
        limit: i64,
    ) -> Result<Vec<RedditPostData>, CoreError> {
        let access_token = self.ensure_authenticated().await?;
        let listing = self
            .api
            .get_subreddit_hot(&access_token, subreddit, limit)
            .await?;
        Ok(listing.into_posts())
    }
}
