use anyhow::anyhow;
use clap::Parser;
use search_core::{AppConfig, ErrorExt};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str =
    "subreddit_search=info,search_service=info,reddit_client=info,tower_http=info";

#[derive(Parser)]
#[command(name = "subreddit-search")]
#[command(about = "Search a subreddit's hot posts for keywords over HTTP", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "SEARCH_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SEARCH_PORT")]
    port: Option<u16>,

    /// Log filter directive, overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loaded before parsing so .env values feed clap's env fallbacks too
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = match &cli.log_filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    tracing::info!("Starting Subreddit Search");

    let mut config = AppConfig::load(cli.config.as_deref()).map_err(|e| {
        e.log_error();
        anyhow!(e.user_friendly_message())
    })?;

    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.validate().map_err(|e| anyhow!(e.user_friendly_message()))?;

    search_service::serve(config).await
}
