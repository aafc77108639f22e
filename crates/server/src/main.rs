//! wartung-server — admin surface and lifecycle-hook endpoints for the
//! update-maintenance component.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use wartung_server::{build_router, AppState};

/// Update-maintenance sidecar: notification routing and settings admin.
#[derive(Parser, Debug)]
#[command(name = "wartung-server", version, about)]
struct Cli {
    /// Bind address (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    wartung_core::config::load_dotenv();
    let mut config = wartung_core::Config::from_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.log_summary();

    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state.clone());

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
