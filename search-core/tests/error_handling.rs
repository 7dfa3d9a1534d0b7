use search_core::{ConfigError, CoreError, ErrorExt, RedditApiError};

#[test]
fn test_error_codes() {
    let reddit_error = CoreError::RedditApi(RedditApiError::InvalidToken);
    assert_eq!(reddit_error.error_code(), "REDDIT_INVALID_TOKEN");

    let not_found = CoreError::RedditApi(RedditApiError::SubredditNotFound {
        subreddit: "doesnotexist".to_string(),
    });
    assert_eq!(not_found.error_code(), "REDDIT_SUBREDDIT_NOT_FOUND");

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "REDDIT_CLIENT_ID".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG_MISSING_ENV_VAR");

    let decode_error = serde_json::from_str::<Vec<i64>>("{").unwrap_err();
    assert_eq!(
        CoreError::Serialization(decode_error).error_code(),
        "SERIALIZATION"
    );
}

#[test]
fn test_display_includes_detail() {
    let error = CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 });
    assert_eq!(
        error.to_string(),
        "Reddit API error: Rate limit exceeded. Retry after 60 seconds"
    );
}

#[test]
fn test_user_friendly_messages() {
    let reddit_error = CoreError::RedditApi(RedditApiError::InvalidToken);
    let message = reddit_error.user_friendly_message();
    assert!(message.contains("authentication token is invalid"));

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "port".to_string(),
        value: "0".to_string(),
    });
    let message = config_error.user_friendly_message();
    assert!(message.contains("port"));

    let subreddit_error = RedditApiError::SubredditNotFound {
        subreddit: "nope".to_string(),
    };
    assert!(subreddit_error.user_friendly_message().contains("'nope'"));
}

#[test]
fn test_logging_returns_self() {
    let error = CoreError::Internal {
        message: "boom".to_string(),
    };

    // Logging without a subscriber installed must not panic
    assert_eq!(error.log_error().error_code(), "INTERNAL");

    let api_error = RedditApiError::ServerError { status_code: 502 };
    assert_eq!(api_error.log_error().error_code(), "REDDIT_SERVER_ERROR");
}
