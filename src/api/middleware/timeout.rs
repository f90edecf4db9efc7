//! Wall-clock budget enforcement.

use std::future::Future;
use std::time::Duration;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::Instrument;

use crate::domain::RequestDeadline;
use crate::error::AppError;

/// Bounds the rest of the chain by `budget`.
///
/// Stores a [`RequestDeadline`] in the request extensions so that handlers
/// can bound their data access by the same instant, then races the
/// downstream chain against it. See [`run_until`].
///
/// # Example
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/workouts", get(list_workouts_handler))
///     .route_layer(middleware::from_fn_with_state(Duration::from_secs(10), timeout::layer));
/// ```
pub async fn layer(State(budget): State<Duration>, mut req: Request, next: Next) -> Response {
    let at = Instant::now() + budget;
    req.extensions_mut().insert(RequestDeadline::at(at));

    run_until(at, next.run(req)).await
}

/// Runs `handler` with a `budget`, answering `408` if it is exceeded.
pub async fn run_with_timeout<F>(budget: Duration, handler: F) -> Response
where
    F: Future<Output = Response> + Send + 'static,
{
    run_until(Instant::now() + budget, handler).await
}

/// Races `handler` against the deadline `at`.
///
/// The handler runs on its own task and hands its response over a oneshot
/// channel, which is the only path by which it can reach the caller. When
/// the deadline wins, the receiver is dropped: the late response is
/// discarded and the task is left to notice its own [`RequestDeadline`].
/// It is not aborted.
pub async fn run_until<F>(at: Instant, handler: F) -> Response
where
    F: Future<Output = Response> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();

    tokio::spawn(
        async move {
            let response = handler.await;
            // Err means the deadline already answered; nothing to do.
            let _ = tx.send(response);
        }
        .in_current_span(),
    );

    tokio::select! {
        result = rx => match result {
            Ok(response) => response,
            Err(_) => {
                tracing::error!("handler task ended without producing a response");
                AppError::internal("Internal server error", json!({})).into_response()
            }
        },
        _ = tokio::time::sleep_until(at) => {
            metrics::counter!("http_request_timeouts_total").increment(1);
            tracing::warn!("request timed out");
            AppError::timed_out().into_response()
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestDeadline {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestDeadline>()
            .copied()
            .unwrap_or_default())
    }
}
