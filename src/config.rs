/// Runtime configuration for the server
///
/// Built from command line arguments in `main.rs`. When no database path is
/// given, a writable default location is picked with `default_database_path`.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Address the HTTP server binds to when none is given
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// File name of the database inside the data directory
const DATABASE_FILE: &str = "habits.db";

/// Where habits and trackings are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite database file
    Sqlite(PathBuf),
    /// Process memory; everything is lost on shutdown
    InMemory,
}

/// Everything needed to start a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub storage: StorageBackend,
    pub bind: SocketAddr,
}

impl ServerConfig {
    /// Config for a SQLite file served on the given address
    pub fn sqlite(db_path: PathBuf, bind: SocketAddr) -> Self {
        Self {
            storage: StorageBackend::Sqlite(db_path),
            bind,
        }
    }
}

/// Get the default database path with robust fallback strategy
pub fn default_database_path() -> std::io::Result<PathBuf> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        // 3. User's config directory
        dirs::config_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if is_writable_dir(potential_path) {
            return Ok(potential_path.join(DATABASE_FILE));
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("habit_tracker");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push(DATABASE_FILE);

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Create the directory if needed and probe it with a throwaway file
fn is_writable_dir(dir: &std::path::Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let test_file = dir.join(".test_write");
    if std::fs::write(&test_file, "test").is_ok() {
        let _ = std::fs::remove_file(&test_file);
        true
    } else {
        false
    }
}

/// Make sure the parent directory of a user-supplied database path exists
pub fn prepare_database_path(path: PathBuf) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(path)
}
