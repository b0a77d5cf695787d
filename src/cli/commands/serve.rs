use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::app::{app, AppState};
use crate::config::{AppConfig, StoreBackend};
use crate::database::fixture::Fixture;
use crate::database::{DatabaseManager, MemoryStore, PgStore};

pub async fn handle(config: AppConfig, seed: Option<PathBuf>) -> anyhow::Result<()> {
    config.validate()?;
    info!("Starting Complex API in {:?} mode", config.environment);
    if crate::is_development!() {
        warn!("Development profile active; set APP_ENV=production for deployments");
    }

    let config = Arc::new(config);
    let state = match config.database.backend {
        StoreBackend::Memory => AppState::from_store(config.clone(), Arc::new(MemoryStore::new())),
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            AppState::from_store(config.clone(), Arc::new(PgStore::new(pool)))
        }
    };

    if let Some(path) = seed {
        Fixture::from_path(&path)
            .await?
            .apply(state.store.as_ref())
            .await
            .with_context(|| format!("failed to apply fixture {}", path.display()))?;
    }

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!(
        "Complex API listening on http://{} ({} store)",
        bind_addr,
        state.store.backend_name()
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Complex API stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
