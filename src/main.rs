use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use guardpost_api::app::{app, AppState};
use guardpost_api::cli::Args;
use guardpost_api::config::config;
use guardpost_api::database::{DatabaseManager, MemoryStore, RecordStore, Repository};
use guardpost_api::observer::ObserverPipeline;
use guardpost_api::services::ResourceService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and PORT can live there
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("guardpost_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = config();
    tracing::info!("Starting Guardpost API in {:?} mode", config.environment);

    let store: Arc<dyn RecordStore> = if args.memory {
        tracing::warn!("Using in-memory storage; records are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let mut database = config.database.clone();
        if let Some(url) = args.database_url {
            database.url = Some(url);
        }
        let manager = DatabaseManager::connect(&database)
            .await
            .context("failed to connect to storage")?;
        manager.ensure_schema().await.context("failed to prepare storage tables")?;
        Arc::new(Repository::new(manager))
    };

    let pipeline = ObserverPipeline::standard().with_timeout(Duration::from_millis(config.api.observer_timeout_ms));
    let service = ResourceService::new(store, Arc::new(pipeline));

    // A panic anywhere stops the server; the process then exits non-zero
    let panicked = Arc::new(AtomicBool::new(false));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    {
        let panicked = panicked.clone();
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!("Fatal panic: {}", info);
            panicked.store(true, Ordering::SeqCst);
            let _ = shutdown_tx.send(true);
            default_hook(info);
        }));
    }

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{}", host, port))?;
    tracing::info!("Guardpost API listening on http://{}:{}", host, port);

    let served = axum::serve(listener, app(AppState::new(service.clone())))
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await;

    service.close().await;
    served.context("server error")?;

    if panicked.load(Ordering::SeqCst) {
        std::process::exit(1);
    }
    tracing::info!("Guardpost API stopped");
    Ok(())
}

async fn shutdown_signal(mut fatal: watch::Receiver<bool>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
            tracing::info!("Shutdown requested");
        }
        _ = fatal.changed() => {
            tracing::error!("Shutting down after fatal error");
        }
    }
}
