/// Habit service: the business rules around habits and their trackings
///
/// Every operation that takes a habit id first checks that the habit exists.
/// The service owns no state of its own; the storage it is constructed with
/// is the only source of truth.

mod habits;
mod tracking;

pub use habits::*;
pub use tracking::*;

use thiserror::Error;

use crate::domain::{Habit, HabitId};
use crate::storage::{SharedStorage, StorageError};

/// Errors returned by service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Habit not found: {habit_id}")]
    NotFound { habit_id: HabitId },

    /// Saving a new habit failed (for example a duplicate name)
    #[error("Habit could not be saved: {source}")]
    PersistenceFailure { source: StorageError },

    #[error("Habit {habit_id} still has {count} tracking entries")]
    HabitHasTrackings { habit_id: HabitId, count: u64 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Service entry point; cheap to clone
#[derive(Clone)]
pub struct HabitService {
    storage: SharedStorage,
}

impl HabitService {
    /// Create a service over the given storage
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Load a habit or fail with `NotFound`
    fn load_habit(&self, habit_id: &HabitId) -> Result<Habit, ServiceError> {
        match self.storage.find_habit(habit_id)? {
            Some(habit) => Ok(habit),
            None => {
                tracing::warn!("Habit not found: {}", habit_id);
                Err(ServiceError::NotFound {
                    habit_id: habit_id.clone(),
                })
            }
        }
    }
}
