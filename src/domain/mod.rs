//! Domain layer containing business entities, store contracts and request deadlines.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (workouts, token claims, token buckets)
//! - [`repositories`] - Data access and in-process store trait definitions
//! - [`deadline`] - Per-request wall-clock budget propagated to data access
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Store traits are implemented in [`crate::infrastructure`] and
//! injected into services at startup.

pub mod deadline;
pub mod entities;
pub mod repositories;

pub use deadline::RequestDeadline;
