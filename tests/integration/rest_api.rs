/// End-to-end tests against the HTTP router
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use habit_tracker_api::*;
use serde_json::Value;
use tempfile::NamedTempFile;
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_text(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn read_habit_round_trip_over_http() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = HabitTrackerServer::new(temp_file.path().to_path_buf()).unwrap();
    let app = server.router();

    let (status, created) = send(
        &app,
        post_json(
            "/api/habits",
            r#"{"name": "Read", "frequency": "DAILY", "startDate": "2024-01-01"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().expect("generated id").to_string();
    assert_eq!(created["name"], "Read");
    assert_eq!(created["description"], Value::Null);
    assert_eq!(created["frequency"], "DAILY");
    assert_eq!(created["startDate"], "2024-01-01");

    let (status, tracking) = send(&app, post_text(&format!("/api/habits/{}/tracking", id), "done")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracking["note"], "done");
    assert_eq!(tracking["habit"]["id"], id.as_str());
    assert!(tracking["timestamp"].is_string());

    let (status, trackings) = send(&app, get(&format!("/api/habits/{}/tracking", id))).await;
    assert_eq!(status, StatusCode::OK);
    let trackings = trackings.as_array().unwrap();
    assert_eq!(trackings.len(), 1);
    assert_eq!(trackings[0]["id"], tracking["id"]);
    assert_eq!(trackings[0]["note"], "done");

    let (status, habits) = send(&app, get("/api/habits")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(habits.as_array().unwrap().len(), 1);
    assert_eq!(habits[0]["name"], "Read");
}

#[tokio::test]
async fn tracking_endpoints_404_for_unknown_habit() {
    let app = HabitTrackerServer::in_memory().router();
    let uri = format!("/api/habits/{}/tracking", HabitId::new());

    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "habit_not_found");

    let (status, _) = send(&app, post_text(&uri, "note")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_blocked_while_trackings_exist() {
    let app = HabitTrackerServer::in_memory().router();

    let (_, created) = send(
        &app,
        post_json(
            "/api/habits",
            r#"{"name": "Run", "description": "5k", "frequency": "WEEKLY", "startDate": "2024-03-01"}"#,
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    send(&app, post_text(&format!("/api/habits/{}/tracking", id), "")).await;

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/habits/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "habit_has_trackings");

    let (status, _) = send(&app, get(&format!("/api/habits/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn patch_with_null_fields_keeps_values() {
    let app = HabitTrackerServer::in_memory().router();

    let (_, created) = send(
        &app,
        post_json(
            "/api/habits",
            r#"{"name": "Meditate", "description": "Ten minutes", "frequency": "DAILY", "startDate": "2024-01-01"}"#,
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let patch = Request::builder()
        .method("PATCH")
        .uri(format!("/api/habits/{}", id))
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"name": null, "description": null, "frequency": "MONTHLY", "startDate": null}"#,
        ))
        .unwrap();
    let (status, updated) = send(&app, patch).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Meditate");
    assert_eq!(updated["description"], "Ten minutes");
    assert_eq!(updated["frequency"], "MONTHLY");
    assert_eq!(updated["startDate"], "2024-01-01");
}
