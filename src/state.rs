//! Shared application state injected into handlers.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::api::middleware::{ChainSettings, Pipeline};
use crate::application::services::{AuthService, RateLimiter, TokenService, WorkoutService};
use crate::config::Config;
use crate::domain::repositories::{CredentialRepository, WorkoutRepository};
use crate::infrastructure::memory::{MemoryBucketStore, MemoryRevocationStore};

/// Request ceilings shared by both route classes.
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub timeout: Duration,
    pub max_body_bytes: usize,
    pub behind_proxy: bool,
}

#[derive(Clone)]
pub struct AppState {
    /// `None` when running without a database (tests).
    pub db: Option<Arc<PgPool>>,
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub workout_service: Arc<WorkoutService>,
    /// Limiter for `/auth` routes.
    pub public_limiter: Arc<RateLimiter>,
    /// Limiter for routes that require a token.
    pub protected_limiter: Arc<RateLimiter>,
    pub limits: RequestLimits,
}

impl AppState {
    /// Wires the services and in-memory stores from `config`.
    ///
    /// # Arguments
    ///
    /// - `db` - pool used by the health check, if any
    /// - `credentials` - upstream credential check used by login
    /// - `workouts` - workout data access
    pub fn new(
        config: &Config,
        db: Option<Arc<PgPool>>,
        credentials: Arc<dyn CredentialRepository>,
        workouts: Arc<dyn WorkoutRepository>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(
            config.token_settings(),
            Arc::new(MemoryRevocationStore::new()),
        ));

        let public_limiter = Arc::new(RateLimiter::new(
            config.auth_rate_limit_burst,
            config.auth_rate_limit_rps,
            Arc::new(MemoryBucketStore::new()),
        ));
        let protected_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_burst,
            config.rate_limit_rps,
            Arc::new(MemoryBucketStore::new()),
        ));

        Self {
            db,
            auth_service: Arc::new(AuthService::new(tokens.clone(), credentials)),
            workout_service: Arc::new(WorkoutService::new(workouts)),
            tokens,
            public_limiter,
            protected_limiter,
            limits: RequestLimits {
                timeout: config.request_timeout(),
                max_body_bytes: config.max_body_bytes,
                behind_proxy: config.behind_proxy,
            },
        }
    }

    fn chain_settings(&self, limiter: &Arc<RateLimiter>) -> ChainSettings {
        ChainSettings {
            timeout: self.limits.timeout,
            max_body_bytes: self.limits.max_body_bytes,
            rate_limiter: limiter.clone(),
            behind_proxy: self.limits.behind_proxy,
            tokens: self.tokens.clone(),
        }
    }

    /// Chain for `/auth` routes.
    pub fn public_pipeline(&self) -> Pipeline {
        Pipeline::public(self.chain_settings(&self.public_limiter))
    }

    /// Chain for routes that require an access token.
    pub fn protected_pipeline(&self) -> Pipeline {
        Pipeline::protected(self.chain_settings(&self.protected_limiter))
    }

    /// Limiters swept by the store janitor.
    pub fn limiters(&self) -> Vec<Arc<RateLimiter>> {
        vec![self.public_limiter.clone(), self.protected_limiter.clone()]
    }
}
