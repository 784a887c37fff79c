//! Arsip device server
//!
//! The minimal read-only HTTP endpoint an operator runs on their own machine to
//! expose locally held upload files to the resolver. One route, four categories,
//! and a listing-based containment check that keeps every response inside the
//! category folder it claims to serve.

pub mod app;
pub mod serve;
