//! API route tables.
//!
//! Routes are grouped by the chain they run behind; the chains themselves
//! are attached in [`crate::routes::app_router`].

use crate::api::handlers::{
    create_workout_handler, delete_workout_handler, get_workout_handler, list_workouts_handler,
    login_handler, logout_handler, me_handler, refresh_handler, update_workout_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Token endpoints, reachable without a token.
///
/// # Endpoints
///
/// - `POST /auth/login`   - Credentials → token pair
/// - `POST /auth/refresh` - Refresh token → new token pair
/// - `POST /auth/logout`  - Revoke a refresh token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login_handler))
        .route("/auth/refresh", post(refresh_handler))
        .route("/auth/logout", post(logout_handler))
}

/// Routes that require a Bearer access token.
///
/// # Endpoints
///
/// - `GET    /me`             - Authenticated caller
/// - `GET    /workouts`       - List the caller's workouts
/// - `POST   /workouts`       - Create a workout
/// - `GET    /workouts/{id}`  - Fetch a workout
/// - `PATCH  /workouts/{id}`  - Partially update a workout
/// - `DELETE /workouts/{id}`  - Delete a workout
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route(
            "/workouts",
            get(list_workouts_handler).post(create_workout_handler),
        )
        .route(
            "/workouts/{id}",
            get(get_workout_handler)
                .patch(update_workout_handler)
                .delete(delete_workout_handler),
        )
}
