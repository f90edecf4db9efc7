//! Background eviction for the in-memory revocation and bucket stores.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::application::services::{RateLimiter, TokenService};

/// Entries removed by one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub revocations: usize,
    pub buckets: usize,
}

/// Runs one eviction pass over the revocation set and every limiter.
pub fn sweep_stores(tokens: &TokenService, limiters: &[Arc<RateLimiter>]) -> SweepReport {
    let revocations = tokens.sweep_revocations(Utc::now());

    let now = Instant::now();
    let buckets = limiters.iter().map(|limiter| limiter.sweep(now)).sum();

    SweepReport {
        revocations,
        buckets,
    }
}

/// Sweeps the stores every `every` until the task is dropped.
///
/// Spawned once at startup next to the HTTP server.
pub async fn run_store_janitor(
    tokens: Arc<TokenService>,
    limiters: Vec<Arc<RateLimiter>>,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let report = sweep_stores(&tokens, &limiters);
        if report.revocations > 0 || report.buckets > 0 {
            tracing::debug!(
                revocations = report.revocations,
                buckets = report.buckets,
                revoked_remaining = tokens.revoked_count(),
                "store sweep"
            );
        }
    }
}
