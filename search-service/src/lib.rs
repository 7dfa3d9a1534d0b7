pub mod search;
pub mod web;

pub use search::{filter_posts, keyword_matches, search_subreddit, try_search_subreddit};
pub use web::{create_router, serve, AppState};
