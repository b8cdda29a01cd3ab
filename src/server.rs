//! HTTP server initialization and runtime setup.
//!
//! Handles backend selection, deletion pool lifecycle and the Axum server.

use crate::config::Config;
use crate::domain::deletion_worker::DeletionPool;
use crate::domain::repositories::RecordRepository;
use crate::infrastructure::persistence::{MemoryRecordRepository, PgRecordRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound on the time spent draining queued deletions at shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Connects a PostgreSQL pool using the configured pool settings.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(database_url: &str, config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Deletion worker pool
/// - Axum HTTP server
///
/// On Ctrl-C the server stops accepting connections, finishes in-flight
/// requests, then drains queued deletions before closing the database pool.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (repository, db_pool): (Arc<dyn RecordRepository>, Option<PgPool>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = connect_pool(database_url, &config).await?;
                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;

                let repository = PgRecordRepository::new(Arc::new(pool.clone()));
                (Arc::new(repository), Some(pool))
            }
            None => {
                tracing::warn!("No database configured, records are kept in memory");
                (Arc::new(MemoryRecordRepository::new()), None)
            }
        };

    let deletion_pool = Arc::new(DeletionPool::start(
        repository.clone(),
        config.deletion_workers,
        config.deletion_queue_capacity,
    ));

    let state = AppState::new(
        repository,
        deletion_pool.clone(),
        &config.base_url,
        config.trusted_subnet,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, draining deletion queue");
    if timeout(DRAIN_TIMEOUT, deletion_pool.shutdown()).await.is_err() {
        tracing::error!(
            "Deletion queue not drained after {} seconds, abandoning pending jobs",
            DRAIN_TIMEOUT.as_secs()
        );
    }

    if let Some(pool) = db_pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}
