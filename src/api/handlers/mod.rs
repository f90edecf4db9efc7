//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod workouts;

pub use auth::{login_handler, logout_handler, me_handler, refresh_handler};
pub use health::health_handler;
pub use workouts::{
    create_workout_handler, delete_workout_handler, get_workout_handler, list_workouts_handler,
    update_workout_handler,
};
