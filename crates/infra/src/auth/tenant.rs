//! Tenant name resolution against the management `/tenants` listing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{ClientOptions, HeaderPolicy, ResourceClientFactory, TenantResolver};
use cloudcmd_domain::{is_guid, CloudCmdError, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::arm::{ArmClient, ArmClientFactory};

const TENANTS_API_VERSION: &str = "2022-12-01";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tenant {
    tenant_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    default_domain: Option<String>,
    #[serde(default)]
    domains: Vec<String>,
}

impl Tenant {
    fn matches(&self, name: &str) -> bool {
        self.tenant_id.eq_ignore_ascii_case(name)
            || self.default_domain.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(name))
            || self.domains.iter().any(|d| d.eq_ignore_ascii_case(name))
            || self.display_name.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(name))
    }
}

/// Resolves tenant names using the ambient identity
///
/// The management client is built on first lookup; answers are memoised for
/// the life of the process.
pub struct ArmTenantResolver {
    factory: ArmClientFactory,
    header_policy: Arc<HeaderPolicy>,
    client: OnceCell<ArmClient>,
    known: Mutex<HashMap<String, String>>,
}

impl ArmTenantResolver {
    pub fn new(factory: ArmClientFactory, header_policy: Arc<HeaderPolicy>) -> Self {
        Self { factory, header_policy, client: OnceCell::new(), known: Mutex::new(HashMap::new()) }
    }

    async fn client(&self) -> Result<&ArmClient> {
        self.client
            .get_or_try_init(|| async {
                let credential = Arc::new(self.factory.create_credential(None).await?);
                let options =
                    ClientOptions { header_policy: Arc::clone(&self.header_policy), retry: None };
                self.factory.create_client(credential, &options).await
            })
            .await
    }
}

#[async_trait]
impl TenantResolver for ArmTenantResolver {
    async fn resolve_tenant(&self, tenant: &str) -> Result<String> {
        if is_guid(tenant) {
            return Ok(tenant.to_string());
        }

        let key = tenant.to_ascii_lowercase();
        if let Some(id) = self.known.lock().get(&key) {
            return Ok(id.clone());
        }

        let tenants: Vec<Tenant> = self.client().await?.list("/tenants", TENANTS_API_VERSION, &[]).await?;
        let id = tenants
            .iter()
            .find(|candidate| candidate.matches(tenant))
            .map(|candidate| candidate.tenant_id.clone())
            .ok_or_else(|| CloudCmdError::NotFound(format!("Tenant '{tenant}' not found")))?;

        debug!(tenant, %id, "resolved tenant name");
        self.known.lock().insert(key, id.clone());
        Ok(id)
    }
}
