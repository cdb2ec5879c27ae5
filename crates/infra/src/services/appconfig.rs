use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{AppConfigService, ResourceScope};
use cloudcmd_domain::{AppConfigurationAccount, Result};
use serde::Deserialize;

use super::{ArmContext, Sku};

const API_VERSION: &str = "2024-05-01";

#[derive(Deserialize)]
struct ConfigurationStore {
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    sku: Option<Sku>,
    #[serde(default)]
    properties: ConfigurationStoreProperties,
}

#[derive(Default, Deserialize)]
struct ConfigurationStoreProperties {
    #[serde(default)]
    endpoint: Option<String>,
}

impl From<ConfigurationStore> for AppConfigurationAccount {
    fn from(store: ConfigurationStore) -> Self {
        Self {
            name: store.name,
            location: store.location,
            endpoint: store.properties.endpoint,
            sku: store.sku.and_then(|sku| sku.name),
        }
    }
}

pub struct AppConfigAdapter {
    context: Arc<ArmContext>,
}

impl AppConfigAdapter {
    pub const fn new(context: Arc<ArmContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl AppConfigService for AppConfigAdapter {
    async fn list_accounts(&self, scope: &ResourceScope) -> Result<Vec<AppConfigurationAccount>> {
        let (client, subscription) = self.context.connect(scope).await?;
        let path = format!(
            "/subscriptions/{subscription}/providers/Microsoft.AppConfiguration/configurationStores"
        );
        let stores: Vec<ConfigurationStore> = client.list(&path, API_VERSION, &[]).await?;
        Ok(stores.into_iter().map(AppConfigurationAccount::from).collect())
    }
}
