use serde::{Deserialize, Serialize};

pub const DEFAULT_POST_LIMIT: i64 = 20;

/// Rendered in place of the author name for deleted or authorless posts.
pub const MISSING_AUTHOR: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub subreddit: String,
    pub keywords: Vec<String>,
    pub limit: i64,
}

impl SearchRequest {
    pub fn new(subreddit: impl Into<String>, raw_keywords: &str, limit: Option<i64>) -> Self {
        Self {
            subreddit: subreddit.into(),
            keywords: Self::parse_keywords(raw_keywords),
            limit: limit.unwrap_or(DEFAULT_POST_LIMIT),
        }
    }

    /// Splits a comma separated keyword list and trims each entry.
    ///
    /// Empty entries are kept: `"rust,"` yields `["rust", ""]`, and the empty
    /// keyword matches every post.
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        raw.split(',').map(|keyword| keyword.trim().to_string()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResult {
    pub title: String,
    pub url: String,
    pub score: i64,
    pub comments: i64,
    pub author: String,
    pub created_utc: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<PostResult>,
}

impl From<Vec<PostResult>> for SearchResponse {
    fn from(results: Vec<PostResult>) -> Self {
        Self { results }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_trimmed() {
        assert_eq!(
            SearchRequest::parse_keywords("foo, bar"),
            vec!["foo".to_string(), "bar".to_string()]
        );
        assert_eq!(
            SearchRequest::parse_keywords("  rust  ,\tasync "),
            vec!["rust".to_string(), "async".to_string()]
        );
    }

    #[test]
    fn test_empty_keywords_are_kept() {
        assert_eq!(
            SearchRequest::parse_keywords("rust,"),
            vec!["rust".to_string(), String::new()]
        );
        assert_eq!(SearchRequest::parse_keywords("   "), vec![String::new()]);
    }

    #[test]
    fn test_request_defaults_limit() {
        let request = SearchRequest::new("rust", "tokio", None);
        assert_eq!(request.limit, DEFAULT_POST_LIMIT);
        assert_eq!(request.keywords, vec!["tokio".to_string()]);

        let request = SearchRequest::new("rust", "tokio", Some(-3));
        assert_eq!(request.limit, -3);
    }

    #[test]
    fn test_response_shape() {
        let response = SearchResponse::from(vec![PostResult {
            title: "Hello".to_string(),
            url: "https://example.com".to_string(),
            score: 10,
            comments: 2,
            author: MISSING_AUTHOR.to_string(),
            created_utc: 1640995200.0,
        }]);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["results"][0]["author"], "N/A");
        assert_eq!(value["results"][0]["comments"], 2);
        assert_eq!(value["results"][0]["created_utc"], 1640995200.0);
    }
}
