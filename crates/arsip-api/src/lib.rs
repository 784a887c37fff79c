//! Arsip resolver API
//!
//! Serves uploaded files through the tiered fallback chain. Library form exists
//! so the HTTP surface can be exercised by integration tests without a running
//! Postgres or network.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
