use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snugglepaws::config::Config;
use snugglepaws::db::{seed_demo_data, MemoryStore};
use snugglepaws::{AppState, DbPool};

#[derive(Parser, Debug)]
#[command(name = "snugglepaws")]
#[command(author, version, about = "Pet marketplace API server", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "snugglepaws.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Skip loading demo data
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;

    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SnugglePaws v{}", env!("CARGO_PKG_VERSION"));

    let store: DbPool = Arc::new(MemoryStore::new());

    if config.seed.enabled && !cli.no_seed {
        seed_demo_data(store.as_ref()).await?;
    }

    if config.payments.webhook_secret.is_none() {
        tracing::warn!("payments.webhook_secret is not set; payment callbacks are disabled");
    }

    let state = Arc::new(AppState::new(config.clone(), store));

    // Periodically drop expired sessions
    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            let purged = sweeper.sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Expired sessions removed");
            }
        }
    });

    let app = snugglepaws::api::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
