//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Liveness, DB check and store sizes (no chain)
//! - `/auth/*`       - Token endpoints (public chain)
//! - `/me`, `/workouts/*` - Resource endpoints (protected chain)
//!
//! # Middleware
//!
//! - **Tracing** - Request span around everything
//! - **Public chain** - timeout → logging → body limit → rate limit
//! - **Protected chain** - timeout → logging → body limit → rate limit → authentication
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state; also supplies the limiters, token
///   service and request ceilings the chains are built from
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state))
}

/// Routes and middleware without path normalization.
pub fn api_router(state: AppState) -> Router {
    let public = state.public_pipeline().apply(api::routes::auth_routes());
    let protected = state
        .protected_pipeline()
        .apply(api::routes::protected_routes());

    Router::new()
        .route("/health", get(health_handler))
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(tracing::layer())
}
