/// Basic unit tests to verify core functionality
use habit_tracker_api::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            "Test Habit".to_string(),
            Some("A test habit".to_string()),
            Frequency::Daily,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.description.as_deref(), Some("A test habit"));
    }

    #[test]
    fn test_tracking_creation() {
        let habit = Habit::new(
            "Test Habit".to_string(),
            None,
            Frequency::Monthly,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );

        let tracking = Tracking::new(habit.clone(), "Great work!".to_string());

        assert_eq!(tracking.habit_id(), &habit.id);
        assert_eq!(tracking.note, "Great work!");
    }

    #[test]
    fn test_summary_mapping_copies_every_field() {
        let habit = Habit::new(
            "Test Habit".to_string(),
            Some("A test habit".to_string()),
            Frequency::Weekly,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        );

        let summary = HabitSummary::from(&habit);

        assert_eq!(summary.id, habit.id);
        assert_eq!(summary.name, habit.name);
        assert_eq!(summary.description, habit.description);
        assert_eq!(summary.frequency, habit.frequency);
        assert_eq!(summary.start_date, habit.start_date);
    }

    #[test]
    fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(temp_file.path().to_path_buf());
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_in_memory_server_starts_empty() {
        let server = HabitTrackerServer::in_memory();
        assert!(server.service().list_habits().unwrap().is_empty());
    }
}
