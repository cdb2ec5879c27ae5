//! Port interfaces for credential and client construction
//!
//! These traits define the boundaries between the cache and the
//! infrastructure that talks to the identity and management endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_domain::Result;

use super::ClientOptions;

/// Resolves a user-supplied tenant name or id to its canonical id
#[async_trait]
pub trait TenantResolver: Send + Sync {
    /// Canonical tenant id for `tenant`
    async fn resolve_tenant(&self, tenant: &str) -> Result<String>;
}

/// Builds credentials and management clients
#[async_trait]
pub trait ResourceClientFactory: Send + Sync {
    type Credential: Send + Sync;
    type Client: Send + Sync;

    /// Build a credential for a resolved tenant; `None` means the ambient
    /// default identity
    async fn create_credential(&self, tenant: Option<&str>) -> Result<Self::Credential>;

    /// Build a management client bound to one credential and one retry policy
    async fn create_client(
        &self,
        credential: Arc<Self::Credential>,
        options: &ClientOptions,
    ) -> Result<Self::Client>;
}
