use anyhow::{Context, Result};
use clap::Parser;
use frontdesk::{create_router, AppState, Config, ProfileStore, SessionController};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "frontdesk", about = "Realtime voice-agent session service")]
struct Args {
    /// Configuration file (TOML, extension omitted)
    #[arg(long, default_value = "config/frontdesk")]
    config: String,

    /// Override the HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let bind = args.bind.unwrap_or_else(|| cfg.service.http.bind.clone());
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("{} v0.1.0", cfg.service.name);
    info!("Live endpoint: {} ({})", cfg.live.url, cfg.live.model);
    info!("Profile path: {}", cfg.profile.path);

    let profile_store = ProfileStore::new(&cfg.profile.path);
    let controller = Arc::new(SessionController::new(cfg, profile_store));
    let app = create_router(AppState::new(controller));

    let addr = format!("{}:{}", bind, port);
    info!("HTTP control API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app).await?;

    Ok(())
}
