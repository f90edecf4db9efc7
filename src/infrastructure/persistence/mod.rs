//! PostgreSQL repository implementations.
//!
//! # Repositories
//!
//! - [`PgWorkoutRepository`] - Workout storage scoped by owner
//! - [`PgCredentialRepository`] - Login credential checks

pub mod pg_credential_repository;
pub mod pg_workout_repository;

pub use pg_credential_repository::PgCredentialRepository;
pub use pg_workout_repository::PgWorkoutRepository;
