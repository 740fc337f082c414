/// REST boundary
///
/// Maps the `/api/habits` routes onto the habit service and turns service
/// errors into HTTP status codes with a JSON error body.

pub mod handlers;

use axum::extract::rejection::{JsonRejection, PathRejection, StringRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::service::{HabitService, ServiceError};

/// Build the router for the habit API
pub fn router(service: HabitService) -> Router {
    Router::new()
        .route(
            "/api/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/api/habits/:id",
            get(handlers::get_habit)
                .patch(handlers::update_habit)
                .delete(handlers::delete_habit),
        )
        .route(
            "/api/habits/:id/tracking",
            get(handlers::list_trackings).post(handlers::add_tracking),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorPayload,
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    code: &'static str,
    message: String,
}

/// Failure returned from a handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_json(rejection: &JsonRejection) -> Self {
        Self::new(rejection.status(), "invalid_json", rejection.body_text())
    }

    pub fn invalid_path(rejection: &PathRejection) -> Self {
        Self::new(rejection.status(), "invalid_id", rejection.body_text())
    }

    pub fn invalid_note(rejection: &StringRejection) -> Self {
        Self::new(rejection.status(), "invalid_note", rejection.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "habit_not_found", message)
            }
            ServiceError::PersistenceFailure { source } if source.is_constraint_violation() => {
                Self::new(StatusCode::CONFLICT, "habit_not_saved", message)
            }
            ServiceError::PersistenceFailure { .. } => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "habit_not_saved", message)
            }
            ServiceError::HabitHasTrackings { .. } => {
                Self::new(StatusCode::CONFLICT, "habit_has_trackings", message)
            }
            ServiceError::Storage(_) => {
                tracing::error!("Storage failure: {}", message);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorPayload {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
