//! HTTP middleware for request governance and observability.
//!
//! Each governance concern is a standalone `from_fn` stage; [`pipeline`]
//! orders them around a route class.
//!
//! - [`timeout`] - Wall-clock budget and [`crate::domain::RequestDeadline`] propagation
//! - [`access_log`] - Access log line per request
//! - [`body_limit`] - Request body size ceiling
//! - [`rate_limit`] - Per-client token bucket
//! - [`auth`] - Bearer access token authentication and the [`auth::AuthUser`] extractor
//! - [`tracing`] - Request spans for everything logged while handling a request

pub mod access_log;
pub mod auth;
pub mod body_limit;
pub mod pipeline;
pub mod rate_limit;
pub mod timeout;
pub mod tracing;

pub use auth::AuthUser;
pub use pipeline::{ChainSettings, Pipeline, Stage};
