//! Process-local stores for revocation and rate-limit state.
//!
//! Both stores are volatile: their contents are lost on restart, which is
//! acceptable because revoked tokens and idle buckets become moot on their
//! own over time. Entries are sharded across `DashMap` segments so unrelated
//! keys rarely contend.

mod buckets;
mod revocations;

pub use buckets::MemoryBucketStore;
pub use revocations::MemoryRevocationStore;
