use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{ResourceScope, StorageService};
use cloudcmd_domain::{Result, StorageAccount};
use serde::Deserialize;

use super::{ArmContext, Sku};

const API_VERSION: &str = "2023-05-01";

#[derive(Deserialize)]
struct StorageAccountResource {
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    sku: Option<Sku>,
    #[serde(default)]
    properties: StorageAccountProperties,
}

#[derive(Default, Deserialize)]
struct StorageAccountProperties {
    #[serde(default, rename = "isHnsEnabled")]
    is_hns_enabled: Option<bool>,
}

impl From<StorageAccountResource> for StorageAccount {
    fn from(resource: StorageAccountResource) -> Self {
        Self {
            name: resource.name,
            location: resource.location,
            kind: resource.kind,
            sku_name: resource.sku.and_then(|sku| sku.name),
            hns_enabled: resource.properties.is_hns_enabled,
        }
    }
}

pub struct StorageAdapter {
    context: Arc<ArmContext>,
}

impl StorageAdapter {
    pub const fn new(context: Arc<ArmContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl StorageService for StorageAdapter {
    async fn list_accounts(&self, scope: &ResourceScope) -> Result<Vec<StorageAccount>> {
        let (client, subscription) = self.context.connect(scope).await?;
        let path = format!("/subscriptions/{subscription}/providers/Microsoft.Storage/storageAccounts");
        let accounts: Vec<StorageAccountResource> = client.list(&path, API_VERSION, &[]).await?;
        Ok(accounts.into_iter().map(StorageAccount::from).collect())
    }
}
