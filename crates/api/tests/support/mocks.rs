//! In-memory area services

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{
    AppConfigService, KeyVaultService, KustoService, MarketplaceService, ResourceScope,
    ServiceBusService, StorageService,
};
use cloudcmd_domain::{
    AppConfigurationAccount, CloudCmdError, KeyVaultKey, KustoCluster, MarketplaceProduct,
    QueueDetails, Result, StorageAccount, TopicDetails,
};
use cloudcmd_lib::AreaServices;
use parking_lot::Mutex;

/// One recorded service call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub scope: ResourceScope,
    pub args: Vec<String>,
}

fn unset<T>(method: &str) -> Result<T> {
    Err(CloudCmdError::Internal(format!("mock response for {method} not set")))
}

/// Implements every area port; each method replays its configured result.
pub struct MockAreas {
    pub storage_accounts: Mutex<Option<Result<Vec<StorageAccount>>>>,
    pub appconfig_accounts: Mutex<Option<Result<Vec<AppConfigurationAccount>>>>,
    pub clusters: Mutex<Option<Result<Vec<KustoCluster>>>>,
    pub cluster: Mutex<Option<Result<Option<KustoCluster>>>>,
    pub queue: Mutex<Option<Result<QueueDetails>>>,
    pub topic: Mutex<Option<Result<TopicDetails>>>,
    pub keys: Mutex<Option<Result<Vec<KeyVaultKey>>>>,
    pub product: Mutex<Option<Result<MarketplaceProduct>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockAreas {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            storage_accounts: Mutex::new(None),
            appconfig_accounts: Mutex::new(None),
            clusters: Mutex::new(None),
            cluster: Mutex::new(None),
            queue: Mutex::new(None),
            topic: Mutex::new(None),
            keys: Mutex::new(None),
            product: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn services(self: &Arc<Self>) -> AreaServices {
        AreaServices {
            storage: self.clone(),
            appconfig: self.clone(),
            kusto: self.clone(),
            servicebus: self.clone(),
            keyvault: self.clone(),
            marketplace: self.clone(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    fn record(&self, method: &'static str, scope: &ResourceScope, args: &[&str]) {
        self.calls.lock().push(Call {
            method,
            scope: scope.clone(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        });
    }
}

fn replay<T: Clone>(slot: &Mutex<Option<Result<T>>>, method: &str) -> Result<T> {
    slot.lock().clone().unwrap_or_else(|| unset(method))
}

#[async_trait]
impl StorageService for MockAreas {
    async fn list_accounts(&self, scope: &ResourceScope) -> Result<Vec<StorageAccount>> {
        self.record("storage.list_accounts", scope, &[]);
        replay(&self.storage_accounts, "storage.list_accounts")
    }
}

#[async_trait]
impl AppConfigService for MockAreas {
    async fn list_accounts(&self, scope: &ResourceScope) -> Result<Vec<AppConfigurationAccount>> {
        self.record("appconfig.list_accounts", scope, &[]);
        replay(&self.appconfig_accounts, "appconfig.list_accounts")
    }
}

#[async_trait]
impl KustoService for MockAreas {
    async fn list_clusters(&self, scope: &ResourceScope) -> Result<Vec<KustoCluster>> {
        self.record("kusto.list_clusters", scope, &[]);
        replay(&self.clusters, "kusto.list_clusters")
    }

    async fn get_cluster(
        &self,
        scope: &ResourceScope,
        cluster_name: &str,
    ) -> Result<Option<KustoCluster>> {
        self.record("kusto.get_cluster", scope, &[cluster_name]);
        replay(&self.cluster, "kusto.get_cluster")
    }
}

#[async_trait]
impl ServiceBusService for MockAreas {
    async fn get_queue_details(
        &self,
        scope: &ResourceScope,
        namespace: &str,
        queue_name: &str,
    ) -> Result<QueueDetails> {
        self.record("servicebus.get_queue_details", scope, &[namespace, queue_name]);
        replay(&self.queue, "servicebus.get_queue_details")
    }

    async fn get_topic_details(
        &self,
        scope: &ResourceScope,
        namespace: &str,
        topic_name: &str,
    ) -> Result<TopicDetails> {
        self.record("servicebus.get_topic_details", scope, &[namespace, topic_name]);
        replay(&self.topic, "servicebus.get_topic_details")
    }
}

#[async_trait]
impl KeyVaultService for MockAreas {
    async fn list_keys(
        &self,
        scope: &ResourceScope,
        vault: &str,
        include_managed: bool,
    ) -> Result<Vec<KeyVaultKey>> {
        let flag = include_managed.to_string();
        self.record("keyvault.list_keys", scope, &[vault, &flag]);
        replay(&self.keys, "keyvault.list_keys")
    }
}

#[async_trait]
impl MarketplaceService for MockAreas {
    async fn get_product(&self, scope: &ResourceScope, product_id: &str) -> Result<MarketplaceProduct> {
        self.record("marketplace.get_product", scope, &[product_id]);
        replay(&self.product, "marketplace.get_product")
    }
}
