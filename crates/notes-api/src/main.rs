//! Notes service binary: configuration, wiring, and process lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use notes_api::config::Config;
use notes_api::storage::Storage;
use notes_api::{app, AppState};
use notes_core::TokenService;

#[derive(Parser, Debug)]
#[command(name = "notes-api")]
#[command(about = "REST API for per-account personal notes")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 3000, env = "NOTES_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "NOTES_BIND")]
    bind: String,

    /// Path to the data directory
    #[arg(long, default_value = "/data", env = "NOTES_DATA_PATH")]
    data_path: String,

    /// Secret used to sign bearer tokens
    #[arg(long, env = "NOTES_TOKEN_SECRET")]
    token_secret: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notes_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.data_path)?;
    let storage = Storage::new(&cli.data_path)?;
    let tokens = TokenService::new(&cli.token_secret, config.tokens.token_lifetime_secs as i64);

    let state = Arc::new(AppState {
        config,
        storage,
        tokens,
    });

    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;

    tracing::info!("Starting notes-api on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Notes service shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
