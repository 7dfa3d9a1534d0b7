//! HTTP server exposing the keyword search endpoint.

pub mod api;
pub mod state;

use anyhow::Result;
use axum::{routing::get, Router};
use search_core::AppConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Start the web server
pub async fn serve(config: AppConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        "Starting search server on http://{}",
        listener.local_addr()?
    );

    let app = create_router(AppState::new(config));
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/search", get(api::search))
        .route("/health", get(api::health_check));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
