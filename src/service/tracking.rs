/// Tracking operations: record a note against a habit and list a habit's notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, Tracking, TrackingId};
use crate::service::{HabitService, HabitSummary, ServiceError};

/// Tracking entry as returned to clients, with the owning habit embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub id: TrackingId,
    pub habit: HabitSummary,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

impl From<Tracking> for TrackingResponse {
    fn from(tracking: Tracking) -> Self {
        Self {
            id: tracking.id,
            habit: HabitSummary::from(tracking.habit),
            timestamp: tracking.timestamp,
            note: tracking.note,
        }
    }
}

impl HabitService {
    /// Record a tracking entry for an existing habit
    ///
    /// The timestamp is taken when this is called. The note is stored as
    /// given, empty included.
    pub fn add_tracking_entry(
        &self,
        habit_id: &HabitId,
        note: String,
    ) -> Result<Tracking, ServiceError> {
        let habit = self.load_habit(habit_id)?;
        let tracking = Tracking::new(habit, note);

        match self.storage.save_tracking(&tracking) {
            Ok(saved) => {
                tracing::info!("Added tracking {} to habit {}", saved.id, habit_id);
                Ok(saved)
            }
            // the habit was deleted after it was loaded
            Err(err) if err.is_constraint_violation() => {
                tracing::warn!("Habit {} vanished before tracking was saved: {}", habit_id, err);
                Err(ServiceError::NotFound {
                    habit_id: habit_id.clone(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// All tracking entries for a habit, in storage order
    pub fn get_all_trackings_for_habit(
        &self,
        habit_id: &HabitId,
    ) -> Result<Vec<Tracking>, ServiceError> {
        self.load_habit(habit_id)?;

        let trackings = self.storage.find_trackings_by_habit(habit_id)?;
        tracing::debug!("Found {} trackings for habit {}", trackings.len(), habit_id);
        Ok(trackings)
    }
}
