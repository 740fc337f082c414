/// Habit operations: list, get, create, update, delete
///
/// Also holds the request and response shapes for habits and the mapping
/// from the Habit entity to its summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit, HabitId, HabitPatch};
use crate::service::{HabitService, ServiceError};
use crate::storage::StorageError;

/// Fields needed to create a habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
}

/// Partial update as it arrives over the wire
///
/// A field that is absent or `null` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
}

impl From<UpdateHabitRequest> for HabitPatch {
    fn from(request: UpdateHabitRequest) -> Self {
        Self {
            name: request.name.into(),
            // a supplied description replaces; there is no wire form for clearing it
            description: request.description.map(Some).into(),
            frequency: request.frequency.into(),
            start_date: request.start_date.into(),
        }
    }
}

/// Habit as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub id: HabitId,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
}

impl From<&Habit> for HabitSummary {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            description: habit.description.clone(),
            frequency: habit.frequency,
            start_date: habit.start_date,
        }
    }
}

impl From<Habit> for HabitSummary {
    fn from(habit: Habit) -> Self {
        Self {
            id: habit.id,
            name: habit.name,
            description: habit.description,
            frequency: habit.frequency,
            start_date: habit.start_date,
        }
    }
}

impl HabitService {
    /// List every habit in storage order
    pub fn list_habits(&self) -> Result<Vec<HabitSummary>, ServiceError> {
        let habits = self.storage.list_habits()?;
        tracing::debug!("Listing {} habits", habits.len());
        Ok(habits.into_iter().map(HabitSummary::from).collect())
    }

    /// Get a single habit
    pub fn get_habit(&self, habit_id: &HabitId) -> Result<HabitSummary, ServiceError> {
        self.load_habit(habit_id).map(HabitSummary::from)
    }

    /// Create a new habit
    ///
    /// Any storage failure while saving is reported as `PersistenceFailure`.
    pub fn create_habit(&self, request: CreateHabitRequest) -> Result<HabitSummary, ServiceError> {
        let habit = Habit::new(
            request.name,
            request.description,
            request.frequency,
            request.start_date,
        );

        match self.storage.save_habit(&habit) {
            Ok(saved) => {
                tracing::info!("Created habit '{}' ({})", saved.name, saved.id);
                Ok(HabitSummary::from(saved))
            }
            Err(source) => {
                tracing::warn!("Failed to save habit '{}': {}", habit.name, source);
                Err(ServiceError::PersistenceFailure { source })
            }
        }
    }

    /// Apply a partial update to an existing habit
    pub fn update_habit(
        &self,
        habit_id: &HabitId,
        patch: HabitPatch,
    ) -> Result<HabitSummary, ServiceError> {
        let mut habit = self.load_habit(habit_id)?;

        if patch.is_empty() {
            tracing::debug!("Empty update for habit {}", habit_id);
        }
        habit.apply(patch);

        // The habit may have been deleted since it was loaded; saving then re-inserts it.
        // A name clash surfaces as a plain storage failure, unlike on create.
        let saved = self.storage.save_habit(&habit)?;
        tracing::info!("Updated habit '{}' ({})", saved.name, saved.id);
        Ok(HabitSummary::from(saved))
    }

    /// Delete a habit
    ///
    /// Deletion is refused while tracking entries still reference the habit.
    pub fn delete_habit(&self, habit_id: &HabitId) -> Result<(), ServiceError> {
        if !self.storage.habit_exists(habit_id)? {
            tracing::warn!("Cannot delete missing habit: {}", habit_id);
            return Err(ServiceError::NotFound {
                habit_id: habit_id.clone(),
            });
        }

        let count = self.storage.count_trackings_by_habit(habit_id)?;
        if count > 0 {
            tracing::warn!("Refusing to delete habit {} with {} trackings", habit_id, count);
            return Err(ServiceError::HabitHasTrackings {
                habit_id: habit_id.clone(),
                count,
            });
        }

        // Not atomic with the checks above: a concurrent delete or tracking
        // insert is caught by the storage and reported here
        match self.storage.delete_habit(habit_id) {
            Ok(()) => {
                tracing::info!("Deleted habit {}", habit_id);
                Ok(())
            }
            Err(StorageError::HabitNotFound { .. }) => Err(ServiceError::NotFound {
                habit_id: habit_id.clone(),
            }),
            Err(err) if err.is_constraint_violation() => Err(ServiceError::HabitHasTrackings {
                habit_id: habit_id.clone(),
                count: self.storage.count_trackings_by_habit(habit_id)?,
            }),
            Err(err) => Err(err.into()),
        }
    }
}
