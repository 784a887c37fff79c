//! Arsip sync daemon
//!
//! Mirrors an origin's uploaded files into local storage so the resolver's
//! local-disk tier stays warm. Runs either as a single pass or as a continuous
//! loop with a fixed five-minute interval, stopped cleanly through a
//! cancellation token.

pub mod engine;
pub mod origin;

pub use engine::{needs_download, SyncEngine, SyncReport};
pub use origin::{HttpOrigin, Origin};
