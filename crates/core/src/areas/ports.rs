//! Port interfaces for resource-area services

use async_trait::async_trait;
use cloudcmd_domain::{
    AppConfigurationAccount, KeyVaultKey, KustoCluster, MarketplaceProduct, QueueDetails, Result,
    RetryPolicy, StorageAccount, TopicDetails,
};

/// Where a resource-area call runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceScope {
    /// Subscription id or display name
    pub subscription: String,
    pub tenant: Option<String>,
    pub retry_policy: Option<RetryPolicy>,
}

impl ResourceScope {
    pub fn new(subscription: impl Into<String>) -> Self {
        Self { subscription: subscription.into(), tenant: None, retry_policy: None }
    }
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Storage accounts in the subscription, in the order the API returns them
    async fn list_accounts(&self, scope: &ResourceScope) -> Result<Vec<StorageAccount>>;
}

#[async_trait]
pub trait AppConfigService: Send + Sync {
    async fn list_accounts(&self, scope: &ResourceScope) -> Result<Vec<AppConfigurationAccount>>;
}

#[async_trait]
pub trait KustoService: Send + Sync {
    async fn list_clusters(&self, scope: &ResourceScope) -> Result<Vec<KustoCluster>>;

    /// `None` when the cluster exists but the API returned no body
    async fn get_cluster(&self, scope: &ResourceScope, cluster_name: &str)
        -> Result<Option<KustoCluster>>;
}

#[async_trait]
pub trait ServiceBusService: Send + Sync {
    async fn get_queue_details(
        &self,
        scope: &ResourceScope,
        namespace: &str,
        queue_name: &str,
    ) -> Result<QueueDetails>;

    async fn get_topic_details(
        &self,
        scope: &ResourceScope,
        namespace: &str,
        topic_name: &str,
    ) -> Result<TopicDetails>;
}

#[async_trait]
pub trait KeyVaultService: Send + Sync {
    async fn list_keys(
        &self,
        scope: &ResourceScope,
        vault: &str,
        include_managed: bool,
    ) -> Result<Vec<KeyVaultKey>>;
}

#[async_trait]
pub trait MarketplaceService: Send + Sync {
    async fn get_product(&self, scope: &ResourceScope, product_id: &str) -> Result<MarketplaceProduct>;
}
