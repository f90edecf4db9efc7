//! Request-inspection helpers shared by middleware stages.
//!
//! - [`bearer`] - Bearer credential extraction from the `Authorization` header
//! - [`client_ip`] - Client identity for rate limiting

pub mod bearer;
pub mod client_ip;
