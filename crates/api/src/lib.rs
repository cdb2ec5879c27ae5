//! # cloudcmd
//!
//! Application layer - leaf commands, context wiring and invocation surfaces.
//!
//! This crate contains:
//! - Leaf commands for each resource area
//! - Application context (dependency injection)
//! - The stdio JSON-lines serving loop
//! - Logging setup shared by the binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires infra adapters into core ports
//! - Provides the `cloudcmd` binary

pub mod commands;
pub mod context;
pub mod server;
pub mod utils;

// Re-export for convenience
pub use commands::AreaServices;
pub use context::*;
