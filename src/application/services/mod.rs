//! Business logic services for the application layer.

pub mod auth_service;
pub mod rate_limiter;
pub mod token_service;
pub mod workout_service;

pub use auth_service::{AuthService, CredentialError};
pub use rate_limiter::RateLimiter;
pub use token_service::{TokenError, TokenService, TokenSettings};
pub use workout_service::WorkoutService;
