/// Request handlers for the habit API

use axum::extract::rejection::{JsonRejection, PathRejection, StringRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::domain::HabitId;
use crate::http::ApiError;
use crate::service::{
    CreateHabitRequest, HabitService, HabitSummary, TrackingResponse, UpdateHabitRequest,
};

fn parse_habit_id(path: Result<Path<Uuid>, PathRejection>) -> Result<HabitId, ApiError> {
    let Path(id) = path.map_err(|rejection| ApiError::invalid_path(&rejection))?;
    Ok(HabitId(id))
}

pub async fn list_habits(
    State(service): State<HabitService>,
) -> Result<Json<Vec<HabitSummary>>, ApiError> {
    info!("Fetching all habits");
    Ok(Json(service.list_habits()?))
}

pub async fn get_habit(
    State(service): State<HabitService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<HabitSummary>, ApiError> {
    let habit_id = parse_habit_id(path)?;
    info!("Fetching habit {}", habit_id);
    Ok(Json(service.get_habit(&habit_id)?))
}

pub async fn create_habit(
    State(service): State<HabitService>,
    payload: Result<Json<CreateHabitRequest>, JsonRejection>,
) -> Result<Json<HabitSummary>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::invalid_json(&rejection))?;
    info!("Adding habit '{}'", request.name);
    Ok(Json(service.create_habit(request)?))
}

pub async fn update_habit(
    State(service): State<HabitService>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateHabitRequest>, JsonRejection>,
) -> Result<Json<HabitSummary>, ApiError> {
    let habit_id = parse_habit_id(path)?;
    let Json(request) = payload.map_err(|rejection| ApiError::invalid_json(&rejection))?;
    info!("Updating habit {}", habit_id);
    Ok(Json(service.update_habit(&habit_id, request.into())?))
}

pub async fn delete_habit(
    State(service): State<HabitService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let habit_id = parse_habit_id(path)?;
    info!("Deleting habit {}", habit_id);
    service.delete_habit(&habit_id)?;
    Ok(StatusCode::OK)
}

/// The request body is the note itself, taken verbatim
pub async fn add_tracking(
    State(service): State<HabitService>,
    path: Result<Path<Uuid>, PathRejection>,
    note: Result<String, StringRejection>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let habit_id = parse_habit_id(path)?;
    let note = note.map_err(|rejection| ApiError::invalid_note(&rejection))?;
    info!("Adding tracking to habit {}", habit_id);
    let tracking = service.add_tracking_entry(&habit_id, note)?;
    Ok(Json(TrackingResponse::from(tracking)))
}

pub async fn list_trackings(
    State(service): State<HabitService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<TrackingResponse>>, ApiError> {
    let habit_id = parse_habit_id(path)?;
    info!("Fetching trackings for habit {}", habit_id);
    let trackings = service.get_all_trackings_for_habit(&habit_id)?;
    Ok(Json(trackings.into_iter().map(TrackingResponse::from).collect()))
}
