use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use simple_notes_api::app::{app, AppState};
use simple_notes_api::auth::PgCredentialProvider;
use simple_notes_api::config;
use simple_notes_api::database::{manager, PgNoteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("simple_notes_api=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Simple Notes API in {:?} mode", config.environment);
    tracing::info!(
        "Note limits: title {} / content {} / owner {}",
        config.notes.max_title_length,
        config.notes.max_content_length,
        config.notes.max_owner_length
    );

    let pool = manager::connect_and_migrate(&config.database)
        .await
        .context("failed to initialise database")?;

    let state = AppState::new(
        Arc::new(PgNoteStore::new(pool.clone())),
        Arc::new(PgCredentialProvider::new(pool.clone())),
        config.notes,
        config.server.base_path.clone(),
    );
    let app = app(state, &config.security.cors_origins);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Simple Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("failed to listen for SIGTERM: {}", e),
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
