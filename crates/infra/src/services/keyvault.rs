//! Key listing goes through the vault's data plane: the vault URI comes from
//! the management API, the keys from the vault itself.

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{KeyVaultService, ResourceScope};
use cloudcmd_domain::{CloudCmdError, KeyVaultKey, Result};
use serde::Deserialize;
use url::Url;

use super::ArmContext;
use crate::arm::ResourceLocator;
use crate::errors::conversions::infra;

const MANAGEMENT_API_VERSION: &str = "2023-07-01";
const DATA_API_VERSION: &str = "7.4";
const VAULT_TYPE: &str = "Microsoft.KeyVault/vaults";
const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

#[derive(Deserialize)]
struct Vault {
    properties: VaultProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultProperties {
    #[serde(default)]
    vault_uri: Option<String>,
}

#[derive(Deserialize)]
struct KeyItem {
    kid: String,
    #[serde(default)]
    managed: Option<bool>,
    #[serde(default)]
    attributes: KeyAttributes,
}

#[derive(Default, Deserialize)]
struct KeyAttributes {
    #[serde(default)]
    enabled: Option<bool>,
}

impl From<KeyItem> for KeyVaultKey {
    fn from(item: KeyItem) -> Self {
        let name = item.kid.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string();
        Self {
            name,
            kid: Some(item.kid),
            managed: item.managed.unwrap_or(false),
            enabled: item.attributes.enabled,
        }
    }
}

pub struct KeyVaultAdapter {
    context: Arc<ArmContext>,
}

impl KeyVaultAdapter {
    pub const fn new(context: Arc<ArmContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl KeyVaultService for KeyVaultAdapter {
    async fn list_keys(
        &self,
        scope: &ResourceScope,
        vault: &str,
        include_managed: bool,
    ) -> Result<Vec<KeyVaultKey>> {
        let (client, subscription) = self.context.connect(scope).await?;
        let id = ResourceLocator::new(&client, &subscription).find(VAULT_TYPE, vault).await?;
        let details: Vault = client.get(&id, MANAGEMENT_API_VERSION).await?;
        let vault_uri = details
            .properties
            .vault_uri
            .ok_or_else(|| CloudCmdError::Remote(format!("Vault '{vault}' has no URI")))?;

        let mut url = Url::parse(&vault_uri).map_err(infra)?.join("keys").map_err(infra)?;
        url.query_pairs_mut().append_pair("api-version", DATA_API_VERSION);

        let items: Vec<KeyItem> = client.list_url(url, VAULT_SCOPE).await?;
        Ok(items
            .into_iter()
            .map(KeyVaultKey::from)
            .filter(|key| include_managed || !key.managed)
            .collect())
    }
}
