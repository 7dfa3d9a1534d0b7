//! Keyword search over a subreddit's hot listing.

use reddit_client::api::RedditPostData;
use reddit_client::RedditClient;
use search_core::{CoreError, ErrorExt, PostResult};
use tracing::{debug, error};

/// True when any keyword occurs in `text`, ignoring case.
pub fn keyword_matches(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}

/// Keeps the posts whose title or self text mentions a keyword, in listing order.
pub fn filter_posts(posts: Vec<RedditPostData>, keywords: &[String]) -> Vec<PostResult> {
    posts
        .into_iter()
        .filter(|post| keyword_matches(&post.searchable_text(), keywords))
        .map(PostResult::from)
        .collect()
}

/// Fetches up to `post_limit` hot posts and filters them, surfacing upstream errors.
pub async fn try_search_subreddit(
    client: &mut RedditClient,
    subreddit: &str,
    keywords: &[String],
    post_limit: i64,
) -> Result<Vec<PostResult>, CoreError> {
    let posts = client.fetch_hot_posts(subreddit, post_limit).await?;
    let fetched = posts.len();
    let results = filter_posts(posts, keywords);

    debug!(
        "{} of {} posts in r/{} matched {:?}",
        results.len(),
        fetched,
        subreddit,
        keywords
    );
    Ok(results)
}

/// Like [`try_search_subreddit`], but any failure is logged and reported as no
/// matches. Callers cannot tell an upstream error from an empty result.
pub async fn search_subreddit(
    client: &mut RedditClient,
    subreddit: &str,
    keywords: &[String],
    post_limit: i64,
) -> Vec<PostResult> {
    match try_search_subreddit(client, subreddit, keywords, post_limit).await {
        Ok(results) => results,
        Err(e) => {
            error!(
                subreddit = %subreddit,
                error_code = %e.error_code(),
                "Error searching subreddit '{}': {}",
                subreddit,
                e
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reddit_client::RedditOAuth2Config;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|keyword| keyword.to_string()).collect()
    }

    fn post(id: &str, title: &str, selftext: &str) -> RedditPostData {
        RedditPostData {
            title: title.to_string(),
            selftext: Some(selftext.to_string()),
            author: Some("ferris".to_string()),
            url: format!("https://example.com/{}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(keyword_matches("FOO update", &keywords(&["foo"])));
        assert!(keyword_matches("foo update", &keywords(&["FOO"])));
        assert!(!keyword_matches("bar update", &keywords(&["foo"])));
    }

    #[test]
    fn test_match_is_any_keyword() {
        let list = keywords(&["foo", "bar"]);
        assert!(keyword_matches("only bar here", &list));
        assert!(keyword_matches("only foo here", &list));
        assert!(!keyword_matches("neither", &list));
    }

    #[test]
    fn test_empty_keyword_matches_everything() {
        assert!(keyword_matches("anything", &keywords(&["zzz", ""])));
        assert!(keyword_matches("", &keywords(&[""])));
    }

    #[test]
    fn test_filter_keeps_listing_order() {
        let posts = vec![
            post("1", "Rust 2.0?", ""),
            post("2", "Gardening", "tomatoes"),
            post("3", "Weekly thread", "ask about RUST"),
            post("4", "Cooking", ""),
            post("5", "Music", "synths"),
        ];

        let results = filter_posts(posts, &keywords(&["rust"]));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://example.com/1");
        assert_eq!(results[1].url, "https://example.com/3");
    }

    #[test]
    fn test_match_spans_title_and_body() {
        // No separator between title and body
        let results = filter_posts(vec![post("1", "foo", "bar")], &keywords(&["foobar"]));
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_empty() {
        let config = RedditOAuth2Config::new(
            "id".to_string(),
            "secret".to_string(),
            "test/1.0".to_string(),
        )
        .with_endpoints("http://127.0.0.1:9", "http://127.0.0.1:9");
        let mut client = RedditClient::new(config).unwrap();

        let results = search_subreddit(&mut client, "rust", &keywords(&["rust"]), 20).await;
        assert!(results.is_empty());
    }
}
