//! Handlers for the `/auth` endpoints and `/me`.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, MeResponse, RefreshRequest, TokenResponse};
use crate::api::extract::JsonBody;
use crate::api::middleware::AuthUser;
use crate::domain::RequestDeadline;
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges credentials for a token pair.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Request Body
///
/// ```json
/// { "email": "ann@example.com", "password": "..." }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails, 401 `invalid_credentials` on a mismatch.
pub async fn login_handler(
    State(state): State<AppState>,
    deadline: RequestDeadline,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let pair = state
        .auth_service
        .login(&payload.email, &payload.password, &deadline)
        .await?;

    Ok(Json(pair.into()))
}

/// Exchanges a refresh token for a new token pair.
///
/// # Endpoint
///
/// `POST /auth/refresh`
///
/// # Errors
///
/// Returns 401 `token_expired` or `invalid_token`.
pub async fn refresh_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let pair = state.auth_service.refresh(&payload.refresh_token)?;

    Ok(Json(pair.into()))
}

/// Revokes a refresh token.
///
/// # Endpoint
///
/// `POST /auth/logout`
///
/// Always answers `204 No Content` for a well-formed body, whether or not the
/// token was valid or already revoked.
pub async fn logout_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state.auth_service.logout(&payload.refresh_token);

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the authenticated caller.
///
/// # Endpoint
///
/// `GET /me`
pub async fn me_handler(AuthUser(user_id): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { user_id })
}
