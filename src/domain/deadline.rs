//! Per-request wall-clock deadline.
//!
//! The timeout stage stores a [`RequestDeadline`] in the request extensions.
//! Handlers extract it and pass it down so that data access observes the
//! same budget as the enforcer: once the deadline passes, bounded work fails
//! with [`AppError::RequestTimedOut`] instead of running on after the caller
//! has already been answered.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::AppError;

/// One-shot, non-resettable deadline for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDeadline {
    at: Option<Instant>,
}

impl RequestDeadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Some(Instant::now() + budget),
        }
    }

    pub fn at(at: Instant) -> Self {
        Self { at: Some(at) }
    }

    /// No deadline; used when a route is mounted without a timeout stage.
    pub fn unbounded() -> Self {
        Self { at: None }
    }

    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    pub fn is_elapsed(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Runs `work`, failing with [`AppError::RequestTimedOut`] if the deadline
    /// passes first. The future is dropped at that point, and never started
    /// if the deadline has already passed.
    pub async fn bound<F, T>(&self, work: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        if self.is_elapsed() {
            return Err(AppError::timed_out());
        }

        match self.at {
            Some(at) => tokio::time::timeout_at(at, work)
                .await
                .map_err(|_| AppError::timed_out())?,
            None => work.await,
        }
    }
}

impl Default for RequestDeadline {
    fn default() -> Self {
        Self::unbounded()
    }
}
