//! Repository and store trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! [`crate::infrastructure`] and are injected into services as `Arc<dyn _>`
//! so they can be swapped (for example, for a bounded or externally backed
//! store) without touching call sites.
//!
//! # Available Contracts
//!
//! - [`WorkoutRepository`] - Workout CRUD scoped to an owner
//! - [`CredentialRepository`] - Opaque credential check yielding a user id
//! - [`RevocationStore`] - Revoked refresh tokens (`mark revoked`, `is revoked`)
//! - [`BucketStore`] - Per-client token buckets (`get-or-create bucket`)
//!
//! Mock implementations of the async repositories are generated via
//! `mockall` for unit tests.

pub mod bucket_store;
pub mod credential_repository;
pub mod revocation_store;
pub mod workout_repository;

pub use bucket_store::{BucketStore, SharedBucket};
pub use credential_repository::CredentialRepository;
pub use revocation_store::RevocationStore;
pub use workout_repository::WorkoutRepository;

#[cfg(test)]
pub use credential_repository::MockCredentialRepository;
#[cfg(test)]
pub use workout_repository::MockWorkoutRepository;
