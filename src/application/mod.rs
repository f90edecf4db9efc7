//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating store and
//! repository calls. Services consume the traits from
//! [`crate::domain::repositories`] and provide a clean API for HTTP handlers
//! and middleware stages.
//!
//! # Available Services
//!
//! - [`services::token_service::TokenService`] - Token issuance, validation and revocation
//! - [`services::rate_limiter::RateLimiter`] - Per-client token-bucket admission
//! - [`services::auth_service::AuthService`] - Login, refresh and logout
//! - [`services::workout_service::WorkoutService`] - Deadline-bound workout CRUD
//!
//! [`janitor`] runs the periodic eviction sweeps for the in-memory stores.

pub mod janitor;
pub mod services;
