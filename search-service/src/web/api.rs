//! REST API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use search_core::{ErrorExt, ErrorResponse, SearchRequest, SearchResponse};
use serde::Serialize;

use super::state::AppState;
use crate::search::search_subreddit;

pub const MISSING_PARAMS_MESSAGE: &str = "Subreddit and keywords are required!";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Raw `/api/search` query parameters.
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub subreddit: Option<String>,
    pub keywords: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// Collects the parameters from decoded query pairs. The first occurrence
    /// of a repeated key wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "subreddit" => &mut params.subreddit,
                "keywords" => &mut params.keywords,
                "limit" => &mut params.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }

    /// `None` when the subreddit or keywords are missing or empty.
    ///
    /// A limit that is not an integer falls back to the default; any integer,
    /// including zero or negative values, is passed through.
    pub fn into_request(self) -> Option<SearchRequest> {
        let subreddit = self.subreddit.filter(|s| !s.is_empty())?;
        let keywords = self.keywords.filter(|k| !k.is_empty())?;
        let limit = self
            .limit
            .and_then(|limit| limit.trim().parse::<i64>().ok());

        Some(SearchRequest::new(subreddit, &keywords, limit))
    }
}

/// Search a subreddit's hot posts for keywords
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(request) = SearchParams::from_pairs(pairs).into_request() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(MISSING_PARAMS_MESSAGE)),
        ));
    };

    tracing::info!(
        "Searching r/{} for {:?} (limit {})",
        request.subreddit,
        request.keywords,
        request.limit
    );

    let mut client = match state.reddit_client() {
        Ok(client) => client,
        Err(e) => {
            e.log_error();
            return Ok(Json(SearchResponse::default()));
        }
    };

    let results = search_subreddit(
        &mut client,
        &request.subreddit,
        &request.keywords,
        request.limit,
    )
    .await;

    Ok(Json(SearchResponse::from(results)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_required_params() {
        assert!(SearchParams::from_pairs(pairs(&[("keywords", "foo")]))
            .into_request()
            .is_none());
        assert!(SearchParams::from_pairs(pairs(&[("subreddit", "rust")]))
            .into_request()
            .is_none());
        assert!(
            SearchParams::from_pairs(pairs(&[("subreddit", ""), ("keywords", "foo")]))
                .into_request()
                .is_none()
        );
    }

    #[test]
    fn test_request_parsing() {
        let request = SearchParams::from_pairs(pairs(&[
            ("subreddit", "rust"),
            ("keywords", "foo, bar"),
            ("limit", "50"),
        ]))
        .into_request()
        .unwrap();

        assert_eq!(request.subreddit, "rust");
        assert_eq!(request.keywords, vec!["foo".to_string(), "bar".to_string()]);
        assert_eq!(request.limit, 50);
    }

    #[test]
    fn test_limit_fallback() {
        let limit_for = |limit: &str| {
            SearchParams::from_pairs(pairs(&[
                ("subreddit", "rust"),
                ("keywords", "foo"),
                ("limit", limit),
            ]))
            .into_request()
            .unwrap()
            .limit
        };

        assert_eq!(limit_for("abc"), 20);
        assert_eq!(limit_for("2.5"), 20);
        assert_eq!(limit_for("-3"), -3);
        assert_eq!(limit_for("0"), 0);
    }

    #[test]
    fn test_first_value_wins() {
        let params = SearchParams::from_pairs(pairs(&[
            ("subreddit", "rust"),
            ("subreddit", "golang"),
            ("other", "ignored"),
        ]));
        assert_eq!(params.subreddit.as_deref(), Some("rust"));
        assert_eq!(params.keywords, None);
    }
}
