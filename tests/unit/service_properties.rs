/// Behavioural checks for the habit service, run against both storage backends
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use habit_tracker_api::*;

fn backends() -> Vec<(&'static str, HabitService)> {
    vec![
        (
            "sqlite",
            HabitService::new(Arc::new(SqliteStorage::open_in_memory().unwrap())),
        ),
        ("memory", HabitService::new(Arc::new(InMemoryStorage::new()))),
    ]
}

fn read_request() -> CreateHabitRequest {
    CreateHabitRequest {
        name: "Read".to_string(),
        description: Some("Twenty pages".to_string()),
        frequency: Frequency::Daily,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

#[test]
fn created_habit_reads_back_with_same_fields() {
    for (backend, service) in backends() {
        let request = read_request();
        let created = service.create_habit(request.clone()).unwrap();
        let fetched = service.get_habit(&created.id).unwrap();

        assert_eq!(fetched.name, request.name, "{}", backend);
        assert_eq!(fetched.description, request.description, "{}", backend);
        assert_eq!(fetched.frequency, request.frequency, "{}", backend);
        assert_eq!(fetched.start_date, request.start_date, "{}", backend);
    }
}

#[test]
fn partial_update_touches_only_supplied_fields() {
    for (backend, service) in backends() {
        let created = service.create_habit(read_request()).unwrap();

        let renamed = service
            .update_habit(
                &created.id,
                UpdateHabitRequest {
                    name: Some("Read more".to_string()),
                    ..UpdateHabitRequest::default()
                }
                .into(),
            )
            .unwrap();
        assert_eq!(renamed.name, "Read more", "{}", backend);
        assert_eq!(renamed.description, created.description, "{}", backend);
        assert_eq!(renamed.frequency, Frequency::Daily, "{}", backend);

        let redated = service
            .update_habit(
                &created.id,
                UpdateHabitRequest {
                    start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
                    description: Some("Thirty pages".to_string()),
                    ..UpdateHabitRequest::default()
                }
                .into(),
            )
            .unwrap();
        assert_eq!(redated.name, "Read more", "{}", backend);
        assert_eq!(redated.description.as_deref(), Some("Thirty pages"), "{}", backend);
        assert_eq!(redated.frequency, Frequency::Daily, "{}", backend);
        assert_eq!(redated.start_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), "{}", backend);
        assert_eq!(service.get_habit(&created.id).unwrap(), redated, "{}", backend);
    }
}

#[test]
fn deleted_habit_is_gone() {
    for (backend, service) in backends() {
        let created = service.create_habit(read_request()).unwrap();

        service.delete_habit(&created.id).unwrap();

        assert!(
            matches!(service.get_habit(&created.id), Err(ServiceError::NotFound { .. })),
            "{}",
            backend
        );
        assert!(
            matches!(service.delete_habit(&created.id), Err(ServiceError::NotFound { .. })),
            "{}",
            backend
        );
    }
}

#[test]
fn tracking_requires_existing_habit() {
    for (backend, service) in backends() {
        let missing = HabitId::new();
        assert!(
            matches!(
                service.add_tracking_entry(&missing, "done".to_string()),
                Err(ServiceError::NotFound { .. })
            ),
            "{}",
            backend
        );

        let created = service.create_habit(read_request()).unwrap();
        let called_at = Utc::now();
        let tracking = service.add_tracking_entry(&created.id, "done".to_string()).unwrap();

        assert_eq!(tracking.habit_id(), &created.id, "{}", backend);
        assert!(tracking.timestamp >= called_at, "{}", backend);
    }
}

#[test]
fn listing_trackings_returns_exactly_what_was_added() {
    for (backend, service) in backends() {
        let read = service.create_habit(read_request()).unwrap();
        let run = service
            .create_habit(CreateHabitRequest {
                name: "Run".to_string(),
                ..read_request()
            })
            .unwrap();

        let mut expected = HashSet::new();
        for note in ["morning", "", "evening"] {
            expected.insert(service.add_tracking_entry(&read.id, note.to_string()).unwrap().id);
        }
        service.add_tracking_entry(&run.id, "5k".to_string()).unwrap();

        let listed: HashSet<TrackingId> = service
            .get_all_trackings_for_habit(&read.id)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, expected, "{}", backend);

        assert!(
            matches!(
                service.get_all_trackings_for_habit(&HabitId::new()),
                Err(ServiceError::NotFound { .. })
            ),
            "{}",
            backend
        );
    }
}

#[test]
fn habit_with_trackings_cannot_be_deleted() {
    for (backend, service) in backends() {
        let created = service.create_habit(read_request()).unwrap();
        service.add_tracking_entry(&created.id, "done".to_string()).unwrap();

        assert!(
            matches!(
                service.delete_habit(&created.id),
                Err(ServiceError::HabitHasTrackings { count: 1, .. })
            ),
            "{}",
            backend
        );
        assert_eq!(service.get_all_trackings_for_habit(&created.id).unwrap().len(), 1, "{}", backend);
    }
}

#[test]
fn read_habit_end_to_end() {
    for (backend, service) in backends() {
        let created = service
            .create_habit(CreateHabitRequest {
                name: "Read".to_string(),
                description: None,
                frequency: Frequency::Daily,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            })
            .unwrap();
        assert_eq!(created.name, "Read", "{}", backend);
        assert_eq!(created.description, None, "{}", backend);

        let before = Utc::now();
        let tracking = service.add_tracking_entry(&created.id, "done".to_string()).unwrap();
        assert_eq!(tracking.habit_id(), &created.id, "{}", backend);
        assert_eq!(tracking.note, "done", "{}", backend);
        assert!(tracking.timestamp >= before, "{}", backend);

        let trackings = service.get_all_trackings_for_habit(&created.id).unwrap();
        assert_eq!(trackings, vec![tracking], "{}", backend);
    }
}
