//! Arsip storage tiers
//!
//! Primitives for the two non-database tiers of the resolution chain: the local
//! filesystem tier over an ordered list of roots, and the HTTP client used to pull
//! a file from an operator-hosted device server. Both report failure through
//! [`TierError`] so the resolver can consume every transport condition as an
//! explicit value instead of a swallowed exception.

pub mod device;
pub mod local;
pub mod traits;

pub use device::DeviceClient;
pub use local::LocalTier;
pub use traits::{TierError, TierResult};
