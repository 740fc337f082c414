/// Public library interface for the Habit Tracker API server
///
/// This module exports the server, the habit service, and the storage types
/// so they can be used by the binary, by tests, or embedded elsewhere.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod service;
pub mod config;
pub mod http;

// Re-export public modules and types
pub use domain::*;
pub use storage::{HabitStorage, InMemoryStorage, SharedStorage, SqliteStorage, StorageError};
pub use service::*;
pub use config::{ServerConfig, StorageBackend};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Service error: {0}")]
    Service(#[from] service::ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Habit tracker server exposing the REST API
///
/// Owns the habit service; the storage behind it is chosen at construction.
pub struct HabitTrackerServer {
    service: HabitService,
}

impl HabitTrackerServer {
    /// Create a server backed by the SQLite database at `db_path`
    ///
    /// This will initialize the database with the required schema
    /// if it doesn't already exist.
    pub fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Tracker server with database: {:?}", db_path);
        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(Arc::new(storage)))
    }

    /// Create a server whose data lives only in memory
    pub fn in_memory() -> Self {
        tracing::info!("Initializing Habit Tracker server with in-memory storage");
        Self::with_storage(Arc::new(InMemoryStorage::new()))
    }

    /// Create a server over any storage implementation
    pub fn with_storage(storage: SharedStorage) -> Self {
        Self {
            service: HabitService::new(storage),
        }
    }

    /// Create a server from a parsed configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        match &config.storage {
            StorageBackend::Sqlite(path) => Self::new(path.clone()),
            StorageBackend::InMemory => Ok(Self::in_memory()),
        }
    }

    /// Router serving the `/api/habits` endpoints
    pub fn router(&self) -> axum::Router {
        http::router(self.service.clone())
    }

    /// Serve HTTP on `bind` until Ctrl-C is received
    pub async fn run(self, bind: SocketAddr) -> Result<(), ServerError> {
        tracing::info!("Starting HTTP server...");

        // Test storage connectivity
        let habits = self.service.list_habits()?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let listener = tokio::net::TcpListener::bind(bind).await?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Get a reference to the habit service (useful for testing)
    pub fn service(&self) -> &HabitService {
        &self.service
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
