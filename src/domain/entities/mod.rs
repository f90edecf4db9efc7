//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Workout`] - A training session owned by a user
//! - [`Claims`] - The signed payload carried inside an identity token
//! - [`TokenBucket`] - Per-client rate accounting state
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! and partial updates (`NewWorkout`, `WorkoutPatch`).

pub mod token;
pub mod token_bucket;
pub mod workout;

pub use token::{Claims, Subject, TokenClass, TokenPair};
pub use token_bucket::TokenBucket;
pub use workout::{NewWorkout, Workout, WorkoutPatch};
