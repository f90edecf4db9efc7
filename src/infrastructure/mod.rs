//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`memory`] - Process-local revocation and rate-limit stores
//! - [`persistence`] - PostgreSQL repository implementations

pub mod memory;
pub mod persistence;
