/// Tracking entity for recording progress against a habit
///
/// A Tracking is a single timestamped note attached to one habit. It is
/// created once and never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitId, TrackingId};

/// A record of one occurrence of a habit
///
/// The owning habit is carried as the full entity, resolved when the
/// tracking is created or loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    /// Unique identifier for this tracking entry
    pub id: TrackingId,
    /// The habit this entry belongs to
    pub habit: Habit,
    /// When the entry was recorded; always assigned by the server
    pub timestamp: DateTime<Utc>,
    /// Free-text note, stored exactly as received
    pub note: String,
}

impl Tracking {
    /// Create a new tracking entry stamped with the current time
    pub fn new(habit: Habit, note: String) -> Self {
        Self {
            id: TrackingId::new(),
            habit,
            timestamp: Utc::now(),
            note,
        }
    }

    /// Create a tracking entry from existing data (used when loading from database)
    pub fn from_existing(
        id: TrackingId,
        habit: Habit,
        timestamp: DateTime<Utc>,
        note: String,
    ) -> Self {
        Self {
            id,
            habit,
            timestamp,
            note,
        }
    }

    pub fn habit_id(&self) -> &HabitId {
        &self.habit.id
    }
}
