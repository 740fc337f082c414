/// Main entry point for the Habit Tracker API server
///
/// This file sets up logging, parses command line arguments, and starts the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use habit_tracker_api::config::{self, DEFAULT_BIND};
use habit_tracker_api::{HabitTrackerServer, ServerConfig, StorageBackend};

/// Command line arguments for the Habit Tracker API server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, conflicts_with = "in_memory")]
    database: Option<PathBuf>,

    /// Keep all data in memory instead of a database file
    #[arg(long)]
    in_memory: bool,

    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> std::io::Result<ServerConfig> {
        let storage = if self.in_memory {
            StorageBackend::InMemory
        } else {
            let path = match self.database {
                Some(path) => config::prepare_database_path(path)?,
                None => config::default_database_path()?,
            };
            StorageBackend::Sqlite(path)
        };

        Ok(ServerConfig {
            storage,
            bind: self.bind,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_tracker_api={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Habit Tracker API server");

    let config = args.into_config()?;
    if let StorageBackend::Sqlite(path) = &config.storage {
        info!("Using database at: {}", path.display());
    }

    let server = HabitTrackerServer::from_config(&config)?;
    server.run(config.bind).await?;

    info!("Habit Tracker API server shutdown complete");
    Ok(())
}
