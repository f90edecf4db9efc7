//! HTTP request span middleware.

use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Span carrying the method and path; query strings are left out since they
/// may carry credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Creates the application-wide tracing layer.
///
/// Every log line emitted while a request is processed (including by the
/// handler task the timeout stage spawns) is nested under the request span.
/// Responses are logged at `DEBUG` with latency in milliseconds; the access
/// log stage already reports every request at `INFO`. Server errors are
/// logged at `ERROR`.
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(workout_routes())
///     .layer(tracing::layer());
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::DEBUG)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}
