//! # cloudcmd Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The retrying HTTP client
//! - Token credentials and tenant resolution
//! - The management (ARM) client, its factory and name lookups
//! - The configuration loader
//! - Resource-area service adapters
//!
//! ## Architecture
//! - Implements traits defined in `cloudcmd-core`
//! - Contains all "impure" code (HTTP, environment, files)

pub mod arm;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod services;

// Re-export commonly used items
pub use arm::{ArmClient, ArmClientFactory, ResourceLocator, SubscriptionResolver};
pub use auth::{ArmTenantResolver, ChainedCredential, CredentialSettings};
pub use errors::InfraError;
pub use http::{HttpClient, RetrySettings};
pub use services::ArmContext;
