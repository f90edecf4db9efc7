//! Handlers for workout endpoints.
//!
//! Every handler is scoped to the authenticated caller and bounds its data
//! access by the request deadline.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::workout::{CreateWorkoutRequest, UpdateWorkoutRequest};
use crate::api::extract::JsonBody;
use crate::api::middleware::AuthUser;
use crate::domain::RequestDeadline;
use crate::domain::entities::Workout;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's workouts, newest first.
///
/// # Endpoint
///
/// `GET /workouts`
pub async fn list_workouts_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    deadline: RequestDeadline,
) -> Result<Json<Vec<Workout>>, AppError> {
    let workouts = state.workout_service.list(user_id, &deadline).await?;
    Ok(Json(workouts))
}

/// Creates a workout owned by the caller.
///
/// # Endpoint
///
/// `POST /workouts`
///
/// # Request Body
///
/// ```json
/// { "title": "Upper Body", "workout_date": "2024-03-01", "notes": "optional" }
/// ```
pub async fn create_workout_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    deadline: RequestDeadline,
    JsonBody(payload): JsonBody<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<Workout>), AppError> {
    payload.validate()?;

    let workout = state
        .workout_service
        .create(payload.into_new_workout(user_id), &deadline)
        .await?;

    Ok((StatusCode::CREATED, Json(workout)))
}

/// Fetches one of the caller's workouts.
///
/// # Endpoint
///
/// `GET /workouts/{id}`
///
/// # Errors
///
/// Returns 404 if the workout does not exist or belongs to another user.
pub async fn get_workout_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    deadline: RequestDeadline,
    Path(id): Path<i64>,
) -> Result<Json<Workout>, AppError> {
    let workout = state.workout_service.get(id, user_id, &deadline).await?;
    Ok(Json(workout))
}

/// Partially updates one of the caller's workouts.
///
/// # Endpoint
///
/// `PATCH /workouts/{id}`
///
/// `"notes": null` clears the notes; omitted fields are left unchanged.
pub async fn update_workout_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    deadline: RequestDeadline,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateWorkoutRequest>,
) -> Result<Json<Workout>, AppError> {
    payload.validate()?;

    if !payload.notes_len_ok() {
        return Err(AppError::bad_request(
            "Validation failed",
            json!({ "notes": ["Notes must be at most 4000 characters"] }),
        ));
    }

    let workout = state
        .workout_service
        .update(id, user_id, payload.into(), &deadline)
        .await?;

    Ok(Json(workout))
}

/// Deletes one of the caller's workouts.
///
/// # Endpoint
///
/// `DELETE /workouts/{id}`
pub async fn delete_workout_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    deadline: RequestDeadline,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.workout_service.delete(id, user_id, &deadline).await?;
    Ok(StatusCode::NO_CONTENT)
}
