/// Habit entity and related functionality
///
/// This module defines the core Habit struct together with the explicit
/// partial-update types used to modify an existing habit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, HabitId};

/// A habit represents something the user wants to do regularly
///
/// The name is meant to be unique, but that rule lives in the storage layer
/// (a UNIQUE column), not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// Calendar date the habit starts on
    pub start_date: NaiveDate,
}

impl Habit {
    /// Create a new habit with a freshly generated identifier
    pub fn new(
        name: String,
        description: Option<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: HabitId::new(),
            name,
            description,
            frequency,
            start_date,
        }
    }

    /// Create a habit from existing data (used when loading from database)
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name,
            description,
            frequency,
            start_date,
        }
    }

    /// Apply a partial update
    ///
    /// Fields marked `Keep` retain their current value. The identifier is
    /// never touched.
    pub fn apply(&mut self, patch: HabitPatch) {
        patch.name.apply_to(&mut self.name);
        patch.description.apply_to(&mut self.description);
        patch.frequency.apply_to(&mut self.frequency);
        patch.start_date.apply_to(&mut self.start_date);
    }
}

/// Per-field instruction for a partial update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the existing value alone
    Keep,
    /// Replace the existing value
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, slot: &mut T) {
        if let FieldUpdate::Set(value) = self {
            *slot = value;
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

/// `None` means "not supplied"
impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Keep,
        }
    }
}

/// Set of changes to apply to an existing habit
///
/// `description` carries an inner `Option` so that clearing it
/// (`Set(None)`) is distinguishable from leaving it alone (`Keep`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HabitPatch {
    pub name: FieldUpdate<String>,
    pub description: FieldUpdate<Option<String>>,
    pub frequency: FieldUpdate<Frequency>,
    pub start_date: FieldUpdate<NaiveDate>,
}

impl HabitPatch {
    /// True when applying this patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_keep()
            && self.description.is_keep()
            && self.frequency.is_keep()
            && self.start_date.is_keep()
    }
}
