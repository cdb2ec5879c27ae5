//! Mock tenant resolver and client factory

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cloudcmd_core::{ClientOptions, HeaderPolicy, ResourceClientCache, ResourceClientFactory, TenantResolver};
use cloudcmd_domain::{CloudCmdError, Result, RetryPolicy};

pub const CONTOSO_ID: &str = "72f988bf-86f1-41af-91ab-2d7cd011db47";
pub const FABRIKAM_ID: &str = "0b1d5a2e-3c4f-4e6a-9b8c-7d6e5f4a3b2c";

/// Resolves domain names and ids from a fixed table, counting lookups.
pub struct MockTenantResolver {
    tenants: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl Default for MockTenantResolver {
    fn default() -> Self {
        let tenants = [
            ("contoso.onmicrosoft.com", CONTOSO_ID),
            (CONTOSO_ID, CONTOSO_ID),
            ("fabrikam.onmicrosoft.com", FABRIKAM_ID),
            (FABRIKAM_ID, FABRIKAM_ID),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { tenants, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl TenantResolver for MockTenantResolver {
    async fn resolve_tenant(&self, tenant: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tenants
            .get(tenant)
            .cloned()
            .ok_or_else(|| CloudCmdError::NotFound(format!("Tenant '{tenant}' not found")))
    }
}

#[derive(Debug)]
pub struct MockCredential {
    pub tenant: Option<String>,
    pub serial: usize,
}

#[derive(Debug)]
pub struct MockClient {
    pub tenant: Option<String>,
    pub retry: Option<RetryPolicy>,
    pub user_agent: String,
    pub credential_serial: usize,
    pub serial: usize,
}

/// Factory that numbers every construction and can be told to fail.
#[derive(Default)]
pub struct MockFactory {
    pub credentials_built: AtomicUsize,
    pub clients_built: AtomicUsize,
    pub fail_credentials: AtomicBool,
    pub fail_clients: AtomicBool,
    /// Artificial latency to widen race windows
    pub build_delay: Option<Duration>,
}

impl MockFactory {
    pub fn slow(delay: Duration) -> Self {
        Self { build_delay: Some(delay), ..Self::default() }
    }
}

#[async_trait]
impl ResourceClientFactory for MockFactory {
    type Credential = MockCredential;
    type Client = MockClient;

    async fn create_credential(&self, tenant: Option<&str>) -> Result<MockCredential> {
        if let Some(delay) = self.build_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_credentials.load(Ordering::SeqCst) {
            return Err(CloudCmdError::Unauthenticated("no credential source configured".into()));
        }
        let serial = self.credentials_built.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MockCredential { tenant: tenant.map(str::to_string), serial })
    }

    async fn create_client(
        &self,
        credential: Arc<MockCredential>,
        options: &ClientOptions,
    ) -> Result<MockClient> {
        if let Some(delay) = self.build_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_clients.load(Ordering::SeqCst) {
            return Err(CloudCmdError::Config("invalid management endpoint".into()));
        }
        let serial = self.clients_built.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MockClient {
            tenant: credential.tenant.clone(),
            retry: options.retry,
            user_agent: options.header_policy.user_agent().to_string(),
            credential_serial: credential.serial,
            serial,
        })
    }
}

pub fn cache_with(factory: MockFactory) -> (Arc<ResourceClientCache<MockFactory>>, Arc<MockTenantResolver>) {
    let resolver = Arc::new(MockTenantResolver::default());
    let cache = ResourceClientCache::new(
        factory,
        Arc::clone(&resolver) as Arc<dyn TenantResolver>,
        Arc::new(HeaderPolicy::new("cloudcmd", "0.0.0-test")),
    );
    (Arc::new(cache), resolver)
}

pub fn policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy { max_retries, ..RetryPolicy::default() }
}
