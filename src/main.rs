use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glossary_manager::{
    api,
    asset_store::AssetStore,
    config::Config,
    store::{JsonStore, TermStore},
    AppState,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "glossary-manager starting");

    // Load configuration
    let config = Config::load()?;

    // Open the collection stores and the uploaded-asset directory
    let terms = TermStore::open(
        config.terms_file(),
        config.backups_dir(),
        config.max_backups,
    )?;
    let images = JsonStore::open(
        config.images_file(),
        config.backups_dir(),
        config.max_backups,
    )?;
    let equations = JsonStore::open(
        config.equations_file(),
        config.backups_dir(),
        config.max_backups,
    )?;
    let assets = AssetStore::new(config.images_dir())?;
    info!(data_dir = %config.data_dir.display(), "Stores opened");

    // Create shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        terms,
        images,
        equations,
        assets,
    });

    // Build and start the HTTP server
    let app = api::create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on: {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
