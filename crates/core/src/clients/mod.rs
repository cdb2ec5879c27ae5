//! Credential and management-client lifecycle
//!
//! Resource-area services do not build credentials or clients themselves.
//! They hold a shared [`ResourceClientCache`] and ask it for a client per
//! call; the cache memoises the most recent credential and client and
//! rebuilds them only when the tenant or retry policy changes.

mod cache;
mod policy;
pub mod ports;

pub use cache::{CacheStats, ResourceClientCache};
pub use policy::{ClientOptions, HeaderPolicy};
pub use ports::{ResourceClientFactory, TenantResolver};
