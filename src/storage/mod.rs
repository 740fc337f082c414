/// Storage layer for persisting habit data
///
/// This module defines the persistence gateway the service layer talks to,
/// along with a SQLite implementation and an in-memory one.

pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

use std::sync::Arc;

use thiserror::Error;
use crate::domain::{Habit, HabitId, Tracking};

/// Storage handle shared between the service and request handlers
pub type SharedStorage = Arc<dyn HabitStorage + Send + Sync>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// A uniqueness or referential rule held by the store was violated
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },
}

impl StorageError {
    /// Whether this failure was caused by a rule the store enforces
    /// (unique name, foreign key) rather than by the store itself
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            StorageError::Constraint(_) => true,
            StorageError::Query(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

/// Trait defining the storage interface for habits and their trackings
///
/// Implementations provide plain key-based persistence. Existence rules and
/// merge semantics belong to the service layer, not here.
pub trait HabitStorage {
    /// Get a habit by ID, `None` when it does not exist
    fn find_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError>;

    /// List every habit in storage order
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Insert the habit, or overwrite the stored row with the same id
    fn save_habit(&self, habit: &Habit) -> Result<Habit, StorageError>;

    /// Delete a habit by id
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// Check whether a habit exists without loading it
    fn habit_exists(&self, habit_id: &HabitId) -> Result<bool, StorageError>;

    /// Insert a new tracking entry
    fn save_tracking(&self, tracking: &Tracking) -> Result<Tracking, StorageError>;

    /// Get every tracking entry that references the given habit
    fn find_trackings_by_habit(&self, habit_id: &HabitId) -> Result<Vec<Tracking>, StorageError>;

    /// Count the tracking entries that reference the given habit
    fn count_trackings_by_habit(&self, habit_id: &HabitId) -> Result<u64, StorageError>;
}
