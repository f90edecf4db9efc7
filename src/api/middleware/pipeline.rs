//! Ordered composition of the request-governance stages.
//!
//! A [`Pipeline`] is resolved once at startup per route class and applied to
//! a [`Router`]. The first stage listed is the outermost: it sees the request
//! first and the response last. Any stage may answer on its own, in which
//! case nothing inside it runs.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;

use super::rate_limit::RateLimitState;
use super::{access_log, auth, body_limit, rate_limit, timeout};
use crate::application::services::{RateLimiter, TokenService};

/// A cross-cutting request stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Wall-clock budget; answers `408`.
    Timeout,
    /// Access log line.
    Logging,
    /// Body size ceiling; answers `413`.
    BodyLimit,
    /// Per-client token bucket; answers `429`.
    RateLimit,
    /// Bearer access token; answers `401`.
    Authenticate,
}

/// Everything the stages need, fixed at startup.
#[derive(Clone)]
pub struct ChainSettings {
    pub timeout: Duration,
    pub max_body_bytes: usize,
    pub rate_limiter: Arc<RateLimiter>,
    pub behind_proxy: bool,
    pub tokens: Arc<TokenService>,
}

/// Immutable, ordered list of stages plus their settings.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Stage]>,
    settings: ChainSettings,
}

impl Pipeline {
    /// Builds a pipeline running `stages` in the given order.
    pub fn new(stages: impl IntoIterator<Item = Stage>, settings: ChainSettings) -> Self {
        Self {
            stages: stages.into_iter().collect(),
            settings,
        }
    }

    /// timeout → logging → body limit → rate limit → authenticate
    ///
    /// Oversized and unauthenticated requests are still logged and still
    /// bounded by the timeout; token verification only runs for requests
    /// that passed the cheaper checks.
    pub fn protected(settings: ChainSettings) -> Self {
        Self::new(
            [
                Stage::Timeout,
                Stage::Logging,
                Stage::BodyLimit,
                Stage::RateLimit,
                Stage::Authenticate,
            ],
            settings,
        )
    }

    /// timeout → logging → body limit → rate limit
    pub fn public(settings: ChainSettings) -> Self {
        Self::new(
            [
                Stage::Timeout,
                Stage::Logging,
                Stage::BodyLimit,
                Stage::RateLimit,
            ],
            settings,
        )
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Wraps every route of `router` in the pipeline.
    ///
    /// Stages are attached with `route_layer`, so they only run for matched
    /// routes and the router can still be merged with others. `router` must
    /// already contain its routes.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // the last layer added is the outermost, so add innermost first
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| self.attach(router, *stage))
    }

    fn attach<S>(&self, router: Router<S>, stage: Stage) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let settings = &self.settings;

        match stage {
            Stage::Timeout => {
                router.route_layer(from_fn_with_state(settings.timeout, timeout::layer))
            }
            Stage::Logging => {
                router.route_layer(from_fn_with_state(settings.behind_proxy, access_log::layer))
            }
            // the stage enforces the configured ceiling, so axum's built-in
            // default must not cap it lower
            Stage::BodyLimit => router
                .route_layer(DefaultBodyLimit::disable())
                .route_layer(from_fn_with_state(
                    settings.max_body_bytes,
                    body_limit::layer,
                )),
            Stage::RateLimit => router.route_layer(from_fn_with_state(
                RateLimitState {
                    limiter: settings.rate_limiter.clone(),
                    behind_proxy: settings.behind_proxy,
                },
                rate_limit::layer,
            )),
            Stage::Authenticate => {
                router.route_layer(from_fn_with_state(settings.tokens.clone(), auth::layer))
            }
        }
    }
}
