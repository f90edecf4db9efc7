//! Workout entity: a dated training session owned by one user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::Subject;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Workout {
    pub id: i64,
    pub user_id: Subject,
    pub title: String,
    pub workout_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new workout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub user_id: Subject,
    pub title: String,
    pub workout_date: NaiveDate,
    pub notes: Option<String>,
}

/// Partial update for an existing workout.
///
/// `None` fields are left unchanged.
/// `notes: Some(None)` clears the notes; `Some(Some(s))` sets them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub title: Option<String>,
    pub workout_date: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

impl WorkoutPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.workout_date.is_none() && self.notes.is_none()
    }

    /// Applies the patch to an in-memory copy.
    pub fn apply_to(&self, workout: &mut Workout) {
        if let Some(title) = &self.title {
            workout.title = title.clone();
        }
        if let Some(date) = self.workout_date {
            workout.workout_date = date;
        }
        if let Some(notes) = &self.notes {
            workout.notes = notes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Workout {
        Workout {
            id: 1,
            user_id: 7,
            title: "Upper Body 2".to_string(),
            workout_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: Some("felt strong".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_patch() {
        assert!(WorkoutPatch::default().is_empty());
    }

    #[test]
    fn test_patch_clears_notes() {
        let mut workout = sample();
        let patch = WorkoutPatch {
            notes: Some(None),
            ..Default::default()
        };

        patch.apply_to(&mut workout);
        assert!(workout.notes.is_none());
        assert_eq!(workout.title, "Upper Body 2");
    }

    #[test]
    fn test_patch_sets_fields() {
        let mut workout = sample();
        let patch = WorkoutPatch {
            title: Some("Legs".to_string()),
            workout_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            notes: None,
        };

        patch.apply_to(&mut workout);
        assert_eq!(workout.title, "Legs");
        assert_eq!(workout.workout_date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(workout.notes.as_deref(), Some("felt strong"));
    }
}
