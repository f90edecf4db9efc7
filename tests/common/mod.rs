#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use fitsync_api::config::Config;
use fitsync_api::domain::entities::{NewWorkout, Subject, Workout, WorkoutPatch};
use fitsync_api::domain::repositories::{CredentialRepository, WorkoutRepository};
use fitsync_api::error::AppError;
use fitsync_api::routes::api_router;
use fitsync_api::state::AppState;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ANN_EMAIL: &str = "ann@example.com";
pub const ANN_PASSWORD: &str = "correct horse";
pub const ANN_ID: Subject = 1;

pub const BOB_EMAIL: &str = "bob@example.com";
pub const BOB_PASSWORD: &str = "battery staple";
pub const BOB_ID: Subject = 2;

/// Configuration with generous limits; tests tighten what they exercise.
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/unused".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        access_token_secret: "test-access-secret".to_string(),
        refresh_token_secret: "test-refresh-secret".to_string(),
        access_token_ttl_minutes: 15,
        refresh_token_ttl_days: 7,
        token_issuer: "fitsync".to_string(),
        rotate_refresh_tokens: false,
        max_body_bytes: 4096,
        request_timeout_seconds: 10,
        rate_limit_rps: 1000.0,
        rate_limit_burst: 1000.0,
        auth_rate_limit_rps: 1000.0,
        auth_rate_limit_burst: 1000.0,
        store_sweep_interval_seconds: 60,
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 1,
        db_max_lifetime: 1,
    }
}

/// Fixed set of users standing in for the credential table.
pub struct StaticCredentials {
    users: Vec<(&'static str, &'static str, Subject)>,
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self {
            users: vec![
                (ANN_EMAIL, ANN_PASSWORD, ANN_ID),
                (BOB_EMAIL, BOB_PASSWORD, BOB_ID),
            ],
        }
    }
}

#[async_trait]
impl CredentialRepository for StaticCredentials {
    async fn verify(&self, email: &str, password: &str) -> Result<Option<Subject>, AppError> {
        Ok(self
            .users
            .iter()
            .find(|(e, p, _)| *e == email && *p == password)
            .map(|(_, _, id)| *id))
    }

    async fn record_login(&self, _user_id: Subject) -> Result<(), AppError> {
        Ok(())
    }
}

/// Workout table kept in memory, with an optional artificial latency.
#[derive(Default)]
pub struct InMemoryWorkouts {
    rows: Mutex<Vec<Workout>>,
    next_id: AtomicI64,
    latency: Option<Duration>,
}

impl InMemoryWorkouts {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkouts {
    async fn create(&self, new_workout: NewWorkout) -> Result<Workout, AppError> {
        self.pause().await;

        let workout = Workout {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: new_workout.user_id,
            title: new_workout.title,
            workout_date: new_workout.workout_date,
            notes: new_workout.notes,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(workout.clone());
        Ok(workout)
    }

    async fn list_for_user(&self, user_id: Subject) -> Result<Vec<Workout>, AppError> {
        self.pause().await;

        let mut rows: Vec<Workout> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.workout_date.cmp(&a.workout_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find(&self, id: i64, user_id: Subject) -> Result<Option<Workout>, AppError> {
        self.pause().await;

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id && w.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        id: i64,
        user_id: Subject,
        patch: WorkoutPatch,
    ) -> Result<Option<Workout>, AppError> {
        self.pause().await;

        let mut rows = self.rows.lock().unwrap();
        let Some(workout) = rows.iter_mut().find(|w| w.id == id && w.user_id == user_id) else {
            return Ok(None);
        };
        patch.apply_to(workout);
        Ok(Some(workout.clone()))
    }

    async fn delete(&self, id: i64, user_id: Subject) -> Result<bool, AppError> {
        self.pause().await;

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|w| !(w.id == id && w.user_id == user_id));
        Ok(rows.len() < before)
    }
}

/// Everything a test needs to poke at the running app.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub workouts: Arc<InMemoryWorkouts>,
}

pub fn spawn_app(config: Config) -> TestApp {
    spawn_app_with(config, InMemoryWorkouts::default())
}

pub fn spawn_app_with(config: Config, workouts: InMemoryWorkouts) -> TestApp {
    let workouts = Arc::new(workouts);
    let state = AppState::new(
        &config,
        None,
        Arc::new(StaticCredentials::default()),
        workouts.clone(),
    );

    let server = TestServer::new(api_router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        workouts,
    }
}

/// Logs in and returns the parsed token response.
pub async fn login(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/auth/login")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

pub async fn access_token(server: &TestServer, email: &str, password: &str) -> String {
    login(server, email, password).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

/// Inserts a user with a bcrypt password hash and returns its id.
pub async fn create_test_user(pool: &sqlx::PgPool, email: &str, password: &str) -> Subject {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $1, crypt($2, gen_salt('bf')))
        RETURNING user_id
        "#,
    )
    .bind(email)
    .bind(password)
    .fetch_one(pool)
    .await
    .unwrap()
}
