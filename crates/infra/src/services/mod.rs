//! Resource-area adapters
//!
//! Each adapter implements one core service port. Adapters share one
//! [`ArmContext`], which owns the process-wide client cache; they compose it
//! rather than inheriting caching behaviour.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cloudcmd_core::{HeaderPolicy, ResourceScope, StorageService};
//! use cloudcmd_domain::Config;
//! use cloudcmd_infra::services::{ArmContext, StorageAdapter};
//!
//! # async fn example() -> cloudcmd_domain::Result<()> {
//! let context = Arc::new(ArmContext::from_config(
//!     &Config::default(),
//!     Arc::new(HeaderPolicy::for_application()),
//! )?);
//! let storage = StorageAdapter::new(context);
//! let accounts = storage.list_accounts(&ResourceScope::new("my-subscription")).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use cloudcmd_core::{HeaderPolicy, ResourceClientCache, ResourceScope};
use cloudcmd_domain::{Config, Result};
use serde::Deserialize;

use crate::arm::{ArmClient, ArmClientFactory, SubscriptionResolver};
use crate::auth::ArmTenantResolver;

pub mod appconfig;
pub mod keyvault;
pub mod kusto;
pub mod marketplace;
pub mod servicebus;
pub mod storage;

pub use appconfig::AppConfigAdapter;
pub use keyvault::KeyVaultAdapter;
pub use kusto::KustoAdapter;
pub use marketplace::MarketplaceAdapter;
pub use servicebus::ServiceBusAdapter;
pub use storage::StorageAdapter;

pub type ArmClientCache = ResourceClientCache<ArmClientFactory>;

/// Client cache plus subscription-name memo shared by every adapter
pub struct ArmContext {
    cache: Arc<ArmClientCache>,
    subscriptions: SubscriptionResolver,
}

impl ArmContext {
    pub fn new(cache: Arc<ArmClientCache>) -> Self {
        Self { cache, subscriptions: SubscriptionResolver::new() }
    }

    /// Wire the factory, tenant resolver and cache from configuration and
    /// the process environment
    pub fn from_config(config: &Config, header_policy: Arc<HeaderPolicy>) -> Result<Self> {
        let factory = ArmClientFactory::from_env(config)?;
        let tenants = ArmTenantResolver::new(factory.clone(), Arc::clone(&header_policy));
        Ok(Self::new(Arc::new(ResourceClientCache::new(factory, Arc::new(tenants), header_policy))))
    }

    pub const fn cache(&self) -> &Arc<ArmClientCache> {
        &self.cache
    }

    /// Cached client for the scope and the canonical subscription id
    pub async fn connect(&self, scope: &ResourceScope) -> Result<(Arc<ArmClient>, String)> {
        let client = self
            .cache
            .management_client(scope.tenant.as_deref(), scope.retry_policy.as_ref())
            .await?;
        let subscription = self.subscriptions.resolve(&client, &scope.subscription).await?;
        Ok((client, subscription))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sku {
    #[serde(default)]
    pub name: Option<String>,
}
