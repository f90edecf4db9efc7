//! Per-client rate limiting stage.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::application::services::RateLimiter;
use crate::error::AppError;
use crate::utils::client_ip::client_key;

/// State for one rate-limited route class.
///
/// Public and protected routes each get their own limiter, so exhausting the
/// login budget does not lock a client out of its data and vice versa.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
    /// Read the client address from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

/// Denies the request with `429 Too Many Requests` when the client's bucket
/// is empty.
///
/// # Key Extraction
///
/// See [`crate::utils::client_ip::client_key`].
///
/// # Example
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/auth/login", post(login_handler))
///     .route_layer(middleware::from_fn_with_state(rate_state, rate_limit::layer));
/// ```
pub async fn layer(
    State(st): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&req, st.behind_proxy);

    if !st.limiter.allow(&client) {
        metrics::counter!("http_rate_limited_total").increment(1);
        tracing::warn!(client = %client, path = %req.uri().path(), "rate limit exceeded");
        return Err(AppError::rate_limited());
    }

    Ok(next.run(req).await)
}
