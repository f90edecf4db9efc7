//! DTOs for the workout endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_with::serde_as;
use validator::Validate;

use crate::domain::entities::{NewWorkout, Subject, WorkoutPatch};

/// Request body for `POST /workouts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkoutRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Calendar date of the session, `YYYY-MM-DD`.
    pub workout_date: NaiveDate,

    #[validate(length(max = 4000, message = "Notes must be at most 4000 characters"))]
    pub notes: Option<String>,
}

impl CreateWorkoutRequest {
    pub fn into_new_workout(self, user_id: Subject) -> NewWorkout {
        NewWorkout {
            user_id,
            title: self.title,
            workout_date: self.workout_date,
            notes: self.notes,
        }
    }
}

/// Request body for `PATCH /workouts/{id}`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `notes` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear notes
/// - **String** → set notes
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWorkoutRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    pub workout_date: Option<NaiveDate>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateWorkoutRequest {
    /// Checks the inner value of `notes`, which `validator` cannot see
    /// through the double option.
    pub fn notes_len_ok(&self) -> bool {
        match &self.notes {
            Some(Some(notes)) => notes.chars().count() <= 4000,
            _ => true,
        }
    }
}

impl From<UpdateWorkoutRequest> for WorkoutPatch {
    fn from(req: UpdateWorkoutRequest) -> Self {
        Self {
            title: req.title,
            workout_date: req.workout_date,
            notes: req.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_absent_null_and_set() {
        let absent: UpdateWorkoutRequest = serde_json::from_str(r#"{"title":"Legs"}"#).unwrap();
        assert_eq!(absent.notes, None);

        let cleared: UpdateWorkoutRequest = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));

        let set: UpdateWorkoutRequest = serde_json::from_str(r#"{"notes":"easy"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("easy".to_string())));
    }

    #[test]
    fn test_create_validation() {
        let req: CreateWorkoutRequest =
            serde_json::from_str(r#"{"title":"","workout_date":"2024-03-01"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateWorkoutRequest =
            serde_json::from_str(r#"{"title":"Run","workout_date":"2024-03-01"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_notes_length_checked_through_double_option() {
        let req = UpdateWorkoutRequest {
            title: None,
            workout_date: None,
            notes: Some(Some("x".repeat(4001))),
        };
        assert!(!req.notes_len_ok());
    }
}
