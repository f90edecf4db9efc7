//! Repository trait for workout data access.

use crate::domain::entities::{NewWorkout, Subject, Workout, WorkoutPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for workouts.
///
/// Every lookup is keyed by both the workout id and the owning user, so a
/// caller can never observe or modify another user's rows.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgWorkoutRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Creates a workout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_workout: NewWorkout) -> Result<Workout, AppError>;

    /// Lists a user's workouts, newest date first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_for_user(&self, user_id: Subject) -> Result<Vec<Workout>, AppError>;

    /// Finds a workout owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, id: i64, user_id: Subject) -> Result<Option<Workout>, AppError>;

    /// Applies a partial update.
    ///
    /// Returns `Ok(None)` if no workout matches `id` + `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(
        &self,
        id: i64,
        user_id: Subject,
        patch: WorkoutPatch,
    ) -> Result<Option<Workout>, AppError>;

    /// Deletes a workout.
    ///
    /// Returns `Ok(true)` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64, user_id: Subject) -> Result<bool, AppError>;
}
