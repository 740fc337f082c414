/// In-memory implementation of the habit storage interface
///
/// Mirrors the rules the SQLite schema enforces (unique habit names, trackings
/// must reference an existing habit, habits with trackings cannot be deleted)
/// so the service behaves the same on either backend.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::domain::{Habit, HabitId, Tracking, TrackingId};
use crate::storage::{HabitStorage, StorageError};

/// Tracking as stored: the habit is kept by id and resolved on read
#[derive(Debug, Clone)]
struct TrackingRow {
    id: TrackingId,
    habit_id: HabitId,
    timestamp: DateTime<Utc>,
    note: String,
}

#[derive(Debug, Default)]
struct Tables {
    habits: Vec<Habit>,
    trackings: Vec<TrackingRow>,
}

/// Storage kept entirely in process memory; contents are lost on drop
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    tables: RwLock<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables
            .read()
            .map_err(|_| StorageError::Connection("In-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables
            .write()
            .map_err(|_| StorageError::Connection("In-memory store lock poisoned".to_string()))
    }
}

impl Tables {
    fn habit(&self, habit_id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| &h.id == habit_id)
    }

    fn resolve(&self, row: &TrackingRow) -> Option<Tracking> {
        self.habit(&row.habit_id).map(|habit| {
            Tracking::from_existing(row.id.clone(), habit.clone(), row.timestamp, row.note.clone())
        })
    }
}

impl HabitStorage for InMemoryStorage {
    fn find_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError> {
        Ok(self.read()?.habit(habit_id).cloned())
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        Ok(self.read()?.habits.clone())
    }

    fn save_habit(&self, habit: &Habit) -> Result<Habit, StorageError> {
        let mut tables = self.write()?;

        if tables.habits.iter().any(|h| h.name == habit.name && h.id != habit.id) {
            return Err(StorageError::Constraint(format!(
                "UNIQUE constraint failed: habits.name ({})",
                habit.name
            )));
        }

        match tables.habits.iter_mut().find(|h| h.id == habit.id) {
            Some(existing) => *existing = habit.clone(),
            None => tables.habits.push(habit.clone()),
        }

        tracing::debug!("Saved habit: {} ({})", habit.name, habit.id);
        Ok(habit.clone())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let mut tables = self.write()?;

        if tables.trackings.iter().any(|t| &t.habit_id == habit_id) {
            return Err(StorageError::Constraint(format!(
                "FOREIGN KEY constraint failed: trackings reference habit {}",
                habit_id
            )));
        }

        let before = tables.habits.len();
        tables.habits.retain(|h| &h.id != habit_id);
        if tables.habits.len() == before {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn habit_exists(&self, habit_id: &HabitId) -> Result<bool, StorageError> {
        Ok(self.read()?.habit(habit_id).is_some())
    }

    fn save_tracking(&self, tracking: &Tracking) -> Result<Tracking, StorageError> {
        let mut tables = self.write()?;

        if tables.habit(tracking.habit_id()).is_none() {
            return Err(StorageError::Constraint(format!(
                "FOREIGN KEY constraint failed: habit {} does not exist",
                tracking.habit_id()
            )));
        }

        tables.trackings.push(TrackingRow {
            id: tracking.id.clone(),
            habit_id: tracking.habit_id().clone(),
            timestamp: tracking.timestamp,
            note: tracking.note.clone(),
        });

        tracing::debug!("Created tracking: {} for habit {}", tracking.id, tracking.habit_id());
        Ok(tracking.clone())
    }

    fn find_trackings_by_habit(&self, habit_id: &HabitId) -> Result<Vec<Tracking>, StorageError> {
        let tables = self.read()?;
        Ok(tables
            .trackings
            .iter()
            .filter(|row| &row.habit_id == habit_id)
            .filter_map(|row| tables.resolve(row))
            .collect())
    }

    fn count_trackings_by_habit(&self, habit_id: &HabitId) -> Result<u64, StorageError> {
        let tables = self.read()?;
        Ok(tables.trackings.iter().filter(|row| &row.habit_id == habit_id).count() as u64)
    }
}
