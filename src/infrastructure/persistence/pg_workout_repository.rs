//! PostgreSQL implementation of the workout repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewWorkout, Subject, Workout, WorkoutPatch};
use crate::domain::repositories::WorkoutRepository;
use crate::error::AppError;

/// PostgreSQL repository for workouts.
///
/// All statements filter on `user_id` in addition to `id`.
pub struct PgWorkoutRepository {
    pool: Arc<PgPool>,
}

impl PgWorkoutRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkoutRepository for PgWorkoutRepository {
    async fn create(&self, new_workout: NewWorkout) -> Result<Workout, AppError> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (user_id, title, workout_date, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, workout_date, notes, created_at
            "#,
        )
        .bind(new_workout.user_id)
        .bind(new_workout.title)
        .bind(new_workout.workout_date)
        .bind(new_workout.notes)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(workout)
    }

    async fn list_for_user(&self, user_id: Subject) -> Result<Vec<Workout>, AppError> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, title, workout_date, notes, created_at
            FROM workouts
            WHERE user_id = $1
            ORDER BY workout_date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(workouts)
    }

    async fn find(&self, id: i64, user_id: Subject) -> Result<Option<Workout>, AppError> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, title, workout_date, notes, created_at
            FROM workouts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(workout)
    }

    async fn update(
        &self,
        id: i64,
        user_id: Subject,
        patch: WorkoutPatch,
    ) -> Result<Option<Workout>, AppError> {
        // $5 distinguishes "leave notes alone" from "set notes to NULL"
        let (notes_present, notes) = match patch.notes {
            Some(notes) => (true, notes),
            None => (false, None),
        };

        let workout = sqlx::query_as::<_, Workout>(
            r#"
            UPDATE workouts
            SET title        = COALESCE($3, title),
                workout_date = COALESCE($4, workout_date),
                notes        = CASE WHEN $5 THEN $6 ELSE notes END
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, workout_date, notes, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.title)
        .bind(patch.workout_date)
        .bind(notes_present)
        .bind(notes)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(workout)
    }

    async fn delete(&self, id: i64, user_id: Subject) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
