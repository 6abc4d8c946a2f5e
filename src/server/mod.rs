//! HTTP surface of the scanner.
//!
//! Endpoints:
//! - `POST /api/scan` - scan a URL
//! - `GET /api/history` - the caller's scans, newest first
//! - `PATCH /api/history/edit` - replace the notes of one of the caller's scans
//! - `DELETE /api/history/delete` - delete one of the caller's scans
//! - `GET /status` - JSON scan counters
//! - `GET /metrics` - Prometheus-compatible metrics

mod handlers;
mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error_handling::ScanStats;
use crate::initialization::init_client;
use crate::probe::HttpProber;
use crate::scan::Scanner;
use crate::storage::{
    init_db_pool_with_path, run_migrations, SessionIdentityProvider, SqliteHistoryStore,
};

use handlers::{
    delete_handler, edit_handler, history_handler, metrics_handler, scan_handler, status_handler,
};
pub use types::{AppState, HistoryEntry, HistoryResponse, StatusResponse};

/// Builds the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/scan", post(scan_handler))
        .route("/api/history", get(history_handler))
        .route("/api/history/edit", patch(edit_handler))
        .route("/api/history/delete", delete(delete_handler))
        .route("/metrics", get(metrics_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Wires the production stack: reqwest prober, SQLite history and sessions.
pub async fn build_app_state(config: &Config) -> Result<AppState> {
    let client = init_client(config).context("Failed to initialize HTTP client")?;

    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let stats = Arc::new(ScanStats::new());
    let history = Arc::new(SqliteHistoryStore::new(pool.clone()));
    let identity = Arc::new(SessionIdentityProvider::new(pool));
    let scanner = Scanner::new(
        Arc::new(HttpProber::new(client)),
        history.clone(),
        Arc::clone(&stats),
        config.scan_timeout(),
    )
    .with_private_target_blocking(config.block_private_targets);

    Ok(AppState {
        scanner: Arc::new(scanner),
        history,
        identity,
        stats,
    })
}

/// Binds `config.bind` and serves until Ctrl-C.
pub async fn start_server(config: Config) -> Result<()> {
    let state = build_app_state(&config).await?;
    let app = router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind server to {}", config.bind))?;
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    log::info!("SafeScan listening on http://{addr}/");
    log::info!("  - Scan: POST http://{addr}/api/scan");
    log::info!("  - Status: http://{addr}/status");
    log::info!("  - Metrics: http://{addr}/metrics");
    if config.block_private_targets {
        log::info!("Private and local targets are blocked");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("SafeScan stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_app_state_creates_database() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            db_path: dir.path().join("safescan.db"),
            ..Default::default()
        };
        let state = build_app_state(&config).await.unwrap();
        assert!(config.db_path.exists());
        assert!(state.history.list_by_owner("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_server_fails_when_address_in_use() {
        let dir = TempDir::new().unwrap();
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = Config {
            bind: taken.local_addr().unwrap(),
            db_path: dir.path().join("safescan.db"),
            ..Default::default()
        };

        let err = start_server(config).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to bind server"));
    }
}
