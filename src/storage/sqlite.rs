/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits and trackings. It handles all SQL queries and data conversion.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{DomainError, Frequency, Habit, HabitId, Tracking, TrackingId};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, name, description, frequency, start_date";

/// SQLite-based storage implementation
///
/// The single connection is guarded by a mutex so the storage can be shared
/// across request handlers. Each call holds the lock for one statement; there
/// is no transaction spanning a service operation.
///
/// Calls are blocking. The HTTP handlers invoke them directly on the tokio
/// worker threads, so a slow disk stalls that worker for the duration.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (useful for tests and throwaway runs)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("Database connection lock poisoned".to_string()))
    }

    /// Read a habit from five consecutive columns starting at `offset`
    fn habit_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(offset)?;
        let id = HabitId::from_string(&id_str).map_err(|e| conversion_error(offset, e))?;

        let frequency_str: String = row.get(offset + 3)?;
        let frequency = frequency_str
            .parse::<Frequency>()
            .map_err(|e| conversion_error(offset + 3, e))?;

        let start_date_str: String = row.get(offset + 4)?;
        let start_date = parse_date(&start_date_str).map_err(|e| conversion_error(offset + 4, e))?;

        Ok(Habit::from_existing(
            id,
            row.get(offset + 1)?, // name
            row.get(offset + 2)?, // description
            frequency,
            start_date,
        ))
    }

    /// Read a tracking row laid out as `id, timestamp, note` followed by the habit columns
    fn tracking_from_row(row: &Row<'_>) -> rusqlite::Result<Tracking> {
        let id_str: String = row.get(0)?;
        let id = TrackingId::from_string(&id_str).map_err(|e| conversion_error(0, e))?;

        let timestamp_str: String = row.get(1)?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|_| conversion_error(1, DomainError::InvalidTimestamp(timestamp_str.clone())))?
            .with_timezone(&Utc);

        let habit = Self::habit_from_row(row, 3)?;

        Ok(Tracking::from_existing(id, habit, timestamp, row.get(2)?))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| DomainError::InvalidDate(s.to_string()))
}

fn conversion_error(column: usize, err: DomainError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Surface constraint failures as their own variant so callers can tell them apart
fn write_error(err: rusqlite::Error) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StorageError::Constraint(message.unwrap_or_else(|| code.to_string()))
        }
        other => StorageError::Query(other),
    }
}

impl HabitStorage for SqliteStorage {
    fn find_habit(&self, habit_id: &HabitId) -> Result<Option<Habit>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS))?;

        let habit = stmt
            .query_row(params![habit_id.to_string()], |row| Self::habit_from_row(row, 0))
            .optional()?;

        Ok(habit)
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM habits ORDER BY rowid", HABIT_COLUMNS))?;
        let habit_iter = stmt.query_map([], |row| Self::habit_from_row(row, 0))?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn save_habit(&self, habit: &Habit) -> Result<Habit, StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO habits (id, name, description, frequency, start_date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                frequency = excluded.frequency,
                start_date = excluded.start_date",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.frequency.as_str(),
                habit.start_date.format("%Y-%m-%d").to_string(),
            ],
        )
        .map_err(write_error)?;

        tracing::debug!("Saved habit: {} ({})", habit.name, habit.id);
        Ok(habit.clone())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let rows_affected = conn
            .execute("DELETE FROM habits WHERE id = ?1", params![habit_id.to_string()])
            .map_err(write_error)?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn habit_exists(&self, habit_id: &HabitId) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM habits WHERE id = ?1)",
            params![habit_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn save_tracking(&self, tracking: &Tracking) -> Result<Tracking, StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO trackings (id, habit_id, timestamp, note) VALUES (?1, ?2, ?3, ?4)",
            params![
                tracking.id.to_string(),
                tracking.habit_id().to_string(),
                tracking.timestamp.to_rfc3339(),
                tracking.note,
            ],
        )
        .map_err(write_error)?;

        tracing::debug!("Created tracking: {} for habit {}", tracking.id, tracking.habit_id());
        Ok(tracking.clone())
    }

    fn find_trackings_by_habit(&self, habit_id: &HabitId) -> Result<Vec<Tracking>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.timestamp, t.note,
                    h.id, h.name, h.description, h.frequency, h.start_date
             FROM trackings t
             JOIN habits h ON h.id = t.habit_id
             WHERE t.habit_id = ?1
             ORDER BY t.rowid",
        )?;
        let tracking_iter = stmt.query_map(params![habit_id.to_string()], Self::tracking_from_row)?;

        let mut trackings = Vec::new();
        for tracking in tracking_iter {
            trackings.push(tracking?);
        }

        Ok(trackings)
    }

    fn count_trackings_by_habit(&self, habit_id: &HabitId) -> Result<u64, StorageError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM trackings WHERE habit_id = ?1",
            params![habit_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }
}
