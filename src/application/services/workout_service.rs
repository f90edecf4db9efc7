//! Workout CRUD scoped to the authenticated user.

use std::sync::Arc;

use serde_json::json;

use crate::domain::RequestDeadline;
use crate::domain::entities::{NewWorkout, Subject, Workout, WorkoutPatch};
use crate::domain::repositories::WorkoutRepository;
use crate::error::AppError;

/// Service for a user's workouts.
///
/// Every repository call is bounded by the caller's [`RequestDeadline`], so
/// a request that has already been answered with a timeout stops touching
/// the database.
pub struct WorkoutService {
    repository: Arc<dyn WorkoutRepository>,
}

impl WorkoutService {
    pub fn new(repository: Arc<dyn WorkoutRepository>) -> Self {
        Self { repository }
    }

    /// Lists `user_id`'s workouts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RequestTimedOut`] if the deadline passes.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(
        &self,
        user_id: Subject,
        deadline: &RequestDeadline,
    ) -> Result<Vec<Workout>, AppError> {
        deadline.bound(self.repository.list_for_user(user_id)).await
    }

    /// Fetches one workout owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the workout does not exist or
    /// belongs to someone else.
    pub async fn get(
        &self,
        id: i64,
        user_id: Subject,
        deadline: &RequestDeadline,
    ) -> Result<Workout, AppError> {
        deadline
            .bound(self.repository.find(id, user_id))
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Creates a workout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RequestTimedOut`] if the deadline passes.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create(
        &self,
        new_workout: NewWorkout,
        deadline: &RequestDeadline,
    ) -> Result<Workout, AppError> {
        let user_id = new_workout.user_id;
        let workout = deadline.bound(self.repository.create(new_workout)).await?;

        tracing::info!(user_id, workout_id = workout.id, "workout created");
        Ok(workout)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the patch changes nothing.
    /// Returns [`AppError::NotFound`] if the workout is not the caller's.
    pub async fn update(
        &self,
        id: i64,
        user_id: Subject,
        patch: WorkoutPatch,
        deadline: &RequestDeadline,
    ) -> Result<Workout, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "No fields to update",
                json!({ "fields": ["title", "workout_date", "notes"] }),
            ));
        }

        deadline
            .bound(self.repository.update(id, user_id, patch))
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Deletes a workout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the workout is not the caller's.
    pub async fn delete(
        &self,
        id: i64,
        user_id: Subject,
        deadline: &RequestDeadline,
    ) -> Result<(), AppError> {
        let removed = deadline.bound(self.repository.delete(id, user_id)).await?;

        if !removed {
            return Err(not_found(id));
        }

        tracing::info!(user_id, workout_id = id, "workout deleted");
        Ok(())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Workout not found", json!({ "id": id }))
}
