use reqwest::{redirect, Client, Method, Response, StatusCode, Url};
use search_core::{ConfigError, CoreError, ErrorExt, PostResult, RedditApiError, MISSING_AUTHOR};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Author value Reddit reports for posts whose account has been removed.
const DELETED_AUTHOR: &str = "[deleted]";

const LINK_KIND: &str = "t3";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

impl RedditListing<RedditPostData> {
    /// Link posts in listing order. Other child kinds are skipped.
    pub fn into_posts(self) -> Vec<RedditPostData> {
        self.data
            .children
            .into_iter()
            .filter(|child| child.kind == LINK_KIND)
            .map(|child| child.data)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditPostData {
    pub title: String,
    pub selftext: Option<String>,
    pub author: Option<String>,
    pub url: String,
    pub created_utc: f64,
    pub score: i64,
    pub num_comments: i64,
}

impl RedditPostData {
    pub fn body(&self) -> &str {
        self.selftext.as_deref().unwrap_or_default()
    }

    /// `None` for deleted accounts and posts without an author.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_deref()
            .filter(|name| !name.is_empty() && *name != DELETED_AUTHOR)
    }

    /// Title and self text joined without a separator, as used for keyword matching.
    pub fn searchable_text(&self) -> String {
        let mut text = String::with_capacity(self.title.len() + self.body().len());
        text.push_str(&self.title);
        text.push_str(self.body());
        text
    }
}

impl From<RedditPostData> for PostResult {
    fn from(post_data: RedditPostData) -> Self {
        let author = post_data
            .author_name()
            .unwrap_or(MISSING_AUTHOR)
            .to_string();

        Self {
            title: post_data.title,
            url: post_data.url,
            score: post_data.score,
            comments: post_data.num_comments,
            author,
            created_utc: post_data.created_utc,
        }
    }
}

#[derive(Debug)]
pub struct RedditApiClient {
    http_client: Client,
    api_url: Url,
    user_agent: String,
}

impl RedditApiClient {
    pub fn new(api_url: String, user_agent: String, timeout: Duration) -> Result<Self, CoreError> {
        let invalid_api_url = || ConfigError::InvalidValue {
            field: "reddit_api_url".to_string(),
            value: api_url.clone(),
        };
        let parsed_url = Url::parse(&api_url).map_err(|_| invalid_api_url())?;
        if parsed_url.cannot_be_a_base() {
            return Err(invalid_api_url().into());
        }

        // Reddit answers unknown subreddits with a redirect to its search page
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            http_client,
            api_url: parsed_url,
            user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Appends `segments` to the API base URL, percent-encoding each one so it
    /// stays a single path segment.
    pub fn endpoint_url(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| CoreError::Internal {
                message: format!("API URL {} cannot take a path", self.api_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Executes an OAuth2 token request on this client's connection settings.
    pub async fn send_oauth_request(
        &self,
        request: oauth2::HttpRequest,
    ) -> Result<oauth2::HttpResponse, reqwest::Error> {
        debug!("Requesting Reddit access token from {}", request.url);
        let response = self
            .http_client
            .request(request.method, request.url.as_str())
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status_code = response.status();
        let headers = response.headers().to_owned();
        let body = response.bytes().await?.to_vec();

        Ok(oauth2::HttpResponse {
            status_code,
            headers,
            body,
        })
    }

    pub async fn make_request(
        &self,
        method: Method,
        path_segments: &[&str],
        access_token: &str,
        query_params: Option<&[(&str, &str)]>,
    ) -> Result<Response, CoreError> {
        let url = self.endpoint_url(path_segments)?;
        let endpoint = url.path().to_string();
        let start_time = Instant::now();

        let mut request_builder = self
            .http_client
            .request(method.clone(), url)
            .bearer_auth(access_token);

        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }

        info!("Making Reddit API request: {} {}", method, endpoint);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);

                if e.is_timeout() {
                    return Err(CoreError::RedditApi(RedditApiError::RequestTimeout));
                } else {
                    return Err(CoreError::Network(e));
                }
            }
        };

        let status = response.status();
        debug!(
            "Reddit responded {} for {} in {:?}",
            status,
            endpoint,
            start_time.elapsed()
        );

        if status.is_success() || status.is_redirection() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }

        let api_error = match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .unwrap_or(60);
                warn!("Rate limited, retry after {} seconds", retry_after);
                RedditApiError::RateLimitExceeded { retry_after }
            }
            StatusCode::UNAUTHORIZED => RedditApiError::InvalidToken,
            StatusCode::FORBIDDEN => RedditApiError::Forbidden { resource: endpoint },
            _ if status.is_server_error() => RedditApiError::ServerError {
                status_code: status.as_u16(),
            },
            _ => RedditApiError::InvalidResponse {
                details: format!("Unexpected status {} for {}", status, endpoint),
            },
        };

        api_error.log_error();
        Err(CoreError::RedditApi(api_error))
    }

    pub async fn get_subreddit_hot(
        &self,
        access_token: &str,
        subreddit: &str,
        limit: i64,
    ) -> Result<RedditListing<RedditPostData>, CoreError> {
        // Dot segments would be resolved away and change the endpoint
        if matches!(subreddit, "." | "..") {
            return Err(CoreError::RedditApi(RedditApiError::SubredditNotFound {
                subreddit: subreddit.to_string(),
            }));
        }

        let limit_str = limit.to_string();
        let params = [("limit", limit_str.as_str()), ("raw_json", "1")];

        let response = self
            .make_request(
                Method::GET,
                &["r", subreddit, "hot"],
                access_token,
                Some(&params[..]),
            )
            .await?;

        let status = response.status();
        if status.is_redirection() || status == StatusCode::NOT_FOUND {
            warn!("r/{} does not exist or is unavailable ({})", subreddit, status);
            return Err(CoreError::RedditApi(RedditApiError::SubredditNotFound {
                subreddit: subreddit.to_string(),
            }));
        }

        let body = response.text().await?;
        let listing: RedditListing<RedditPostData> =
            serde_json::from_str(&body).map_err(|e| {
                error!("Failed to parse posts for r/{}: {}", subreddit, e);
                CoreError::Serialization(e)
            })?;

        info!(
            "Retrieved {} posts from r/{}",
            listing.data.children.len(),
            subreddit
        );
        Ok(listing)
    }
}
