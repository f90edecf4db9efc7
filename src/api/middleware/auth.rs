//! Bearer token authentication stage.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::application::services::TokenService;
use crate::domain::entities::Subject;
use crate::error::AppError;
use crate::utils::bearer::extract_bearer;

/// Authenticated caller, inserted by [`layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Subject);

/// Resolves the caller from an `Authorization: Bearer <token>` header.
///
/// # Errors
///
/// - [`AppError::MissingCredential`] - no `Authorization` header
/// - [`AppError::MalformedCredential`] - not a bearer credential
/// - [`AppError::ExpiredToken`] - genuine access token past its expiry
/// - [`AppError::InvalidToken`] - anything else
pub fn authenticate_request(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<Subject, AppError> {
    let token = extract_bearer(headers)?;
    let claims = tokens.validate_access(token)?;

    claims.subject().ok_or_else(AppError::invalid_token)
}

/// Authenticates requests using Bearer access tokens.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the subject is stored as an [`AuthUser`] extension and the
/// request continues. Failures answer `401` with `WWW-Authenticate: Bearer`
/// and are logged at `debug` by code only; the token is never logged.
pub async fn layer(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let subject = authenticate_request(req.headers(), &tokens)
        .inspect_err(|e| tracing::debug!(reason = %e, "authentication failed"))?;

    req.extensions_mut().insert(AuthUser(subject));

    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::missing_credential("Authentication required"))
    }
}
