mod common;

use chrono::NaiveDate;
use fitsync_api::domain::entities::{NewWorkout, WorkoutPatch};
use fitsync_api::domain::repositories::WorkoutRepository;
use fitsync_api::infrastructure::persistence::PgWorkoutRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_workout(user_id: i64, title: &str, day: u32) -> NewWorkout {
    NewWorkout {
        user_id,
        title: title.to_string(),
        workout_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        notes: Some("notes".to_string()),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_and_list_newest_first(pool: PgPool) {
    let user = common::create_test_user(&pool, "ann@example.com", "pw").await;
    let repo = PgWorkoutRepository::new(Arc::new(pool));

    repo.create(new_workout(user, "Legs", 1)).await.unwrap();
    repo.create(new_workout(user, "Upper", 3)).await.unwrap();

    let workouts = repo.list_for_user(user).await.unwrap();

    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].title, "Upper");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_scoped_to_owner(pool: PgPool) {
    let ann = common::create_test_user(&pool, "ann@example.com", "pw").await;
    let bob = common::create_test_user(&pool, "bob@example.com", "pw").await;
    let repo = PgWorkoutRepository::new(Arc::new(pool));

    let workout = repo.create(new_workout(ann, "Swim", 1)).await.unwrap();

    assert!(repo.find(workout.id, bob).await.unwrap().is_none());
    assert!(
        repo.update(
            workout.id,
            bob,
            WorkoutPatch {
                title: Some("Mine".to_string()),
                ..Default::default()
            }
        )
        .await
        .unwrap()
        .is_none()
    );
    assert!(!repo.delete(workout.id, bob).await.unwrap());
    assert!(repo.find(workout.id, ann).await.unwrap().is_some());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_distinguishes_cleared_notes(pool: PgPool) {
    let user = common::create_test_user(&pool, "ann@example.com", "pw").await;
    let repo = PgWorkoutRepository::new(Arc::new(pool));
    let workout = repo.create(new_workout(user, "Run", 1)).await.unwrap();

    let renamed = repo
        .update(
            workout.id,
            user,
            WorkoutPatch {
                title: Some("Long Run".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.title, "Long Run");
    assert_eq!(renamed.notes.as_deref(), Some("notes"));

    let cleared = repo
        .update(
            workout.id,
            user,
            WorkoutPatch {
                notes: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.notes.is_none());
    assert_eq!(cleared.title, "Long Run");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete(pool: PgPool) {
    let user = common::create_test_user(&pool, "ann@example.com", "pw").await;
    let repo = PgWorkoutRepository::new(Arc::new(pool));
    let workout = repo.create(new_workout(user, "Run", 1)).await.unwrap();

    assert!(repo.delete(workout.id, user).await.unwrap());
    assert!(!repo.delete(workout.id, user).await.unwrap());
}
