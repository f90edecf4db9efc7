//! Request body size ceiling.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, Method, header},
    middleware::Next,
    response::Response,
};
use http_body_util::Limited;

use crate::error::AppError;

/// Ceiling in effect for the request, stored as an extension so that body
/// extractors can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimit(pub usize);

/// Rejects `POST`, `PUT` and `PATCH` bodies larger than `limit` bytes.
///
/// A declared `Content-Length` over the limit is refused with `413` before
/// the body is touched. Otherwise the body is wrapped in [`Limited`], so a
/// streamed body that runs past the limit fails when
/// [`crate::api::extract::JsonBody`] reads it, with the same `413`.
/// Other methods pass through unchanged.
pub async fn layer(
    State(limit): State<usize>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH) {
        return Ok(next.run(req).await);
    }

    if let Some(declared) = content_length(req.headers())
        && declared > limit as u64
    {
        tracing::warn!(declared, limit, "request body too large");
        return Err(AppError::body_too_large(limit));
    }

    let mut req = req.map(|body| Body::new(Limited::new(body, limit)));
    req.extensions_mut().insert(BodyLimit(limit));

    Ok(next.run(req).await)
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
