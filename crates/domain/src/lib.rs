//! # cloudcmd Domain
//!
//! Value types shared by every cloudcmd layer.
//!
//! This crate contains:
//! - The error taxonomy (`CloudCmdError`) and Result alias
//! - `RetryPolicy` and the uniform `CommandResponse`
//! - Configuration structures
//! - Resource payload models returned by area commands
//!
//! ## Architecture
//! - Depends only on `cloudcmd-common` for error classification and validation
//! - No I/O; pure data and conversions

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
