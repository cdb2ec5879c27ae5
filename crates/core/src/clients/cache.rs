//! Single-slot credential and client cache

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cloudcmd_domain::{CloudCmdError, Result, RetryPolicy};
use parking_lot::Mutex;
use tracing::debug;

use super::{ClientOptions, HeaderPolicy, ResourceClientFactory, TenantResolver};

struct CredentialSlot<C> {
    tenant: Option<String>,
    credential: Arc<C>,
}

struct ClientSlot<C> {
    tenant: Option<String>,
    retry: Option<RetryPolicy>,
    client: Arc<C>,
}

#[derive(Default)]
struct Counters {
    credential_hits: AtomicU64,
    credential_misses: AtomicU64,
    credentials_created: AtomicU64,
    client_hits: AtomicU64,
    client_misses: AtomicU64,
    clients_created: AtomicU64,
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub credential_hits: u64,
    pub credential_misses: u64,
    pub credentials_created: u64,
    pub client_hits: u64,
    pub client_misses: u64,
    pub clients_created: u64,
}

/// Memoises one credential (keyed by resolved tenant) and one management
/// client (keyed by resolved tenant and retry policy)
///
/// Each slot is guarded by its own mutex, held only to compare or replace
/// the entry. Construction runs outside the lock and the slot is written only
/// after it succeeds, so an abandoned or failed construction never leaves a
/// partial entry behind. Two concurrent misses may both construct; the last
/// one to finish owns the slot.
pub struct ResourceClientCache<F: ResourceClientFactory> {
    factory: F,
    tenants: Arc<dyn TenantResolver>,
    header_policy: Arc<HeaderPolicy>,
    credential: Mutex<Option<CredentialSlot<F::Credential>>>,
    client: Mutex<Option<ClientSlot<F::Client>>>,
    counters: Counters,
}

impl<F: ResourceClientFactory> ResourceClientCache<F> {
    pub fn new(factory: F, tenants: Arc<dyn TenantResolver>, header_policy: Arc<HeaderPolicy>) -> Self {
        Self {
            factory,
            tenants,
            header_policy,
            credential: Mutex::new(None),
            client: Mutex::new(None),
            counters: Counters::default(),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn header_policy(&self) -> &Arc<HeaderPolicy> {
        &self.header_policy
    }

    /// Canonical tenant id; `None` for an absent or blank tenant
    pub async fn resolve_tenant(&self, tenant: Option<&str>) -> Result<Option<String>> {
        match tenant.map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(None),
            Some(tenant) => self.tenants.resolve_tenant(tenant).await.map(Some),
        }
    }

    /// Credential for `tenant`, reused while the resolved tenant is unchanged
    ///
    /// # Errors
    /// Tenant resolution failures unchanged; construction failures as
    /// `CredentialCreation`.
    pub async fn credential(&self, tenant: Option<&str>) -> Result<Arc<F::Credential>> {
        let resolved = self.resolve_tenant(tenant).await?;
        self.credential_for(resolved).await
    }

    /// Management client for `tenant` and `retry`
    ///
    /// Reused only when both the resolved tenant and the retry policy match
    /// the cached entry by value.
    ///
    /// # Errors
    /// Tenant resolution failures unchanged; `CredentialCreation` or
    /// `ClientCreation` when construction fails.
    pub async fn management_client(
        &self,
        tenant: Option<&str>,
        retry: Option<&RetryPolicy>,
    ) -> Result<Arc<F::Client>> {
        let resolved = self.resolve_tenant(tenant).await?;

        if let Some(client) = self.cached_client(resolved.as_deref(), retry) {
            self.counters.client_hits.fetch_add(1, Ordering::Relaxed);
            debug!(cache = "client", tenant = ?resolved, "management client cache hit");
            return Ok(client);
        }
        self.counters.client_misses.fetch_add(1, Ordering::Relaxed);
        debug!(cache = "client", tenant = ?resolved, retry = ?retry, "management client cache miss");

        let credential = self.credential_for(resolved.clone()).await?;
        let options =
            ClientOptions { header_policy: Arc::clone(&self.header_policy), retry: retry.copied() };
        let client = self
            .factory
            .create_client(credential, &options)
            .await
            .map(Arc::new)
            .map_err(|err| match err {
                CloudCmdError::ClientCreation(_) => err,
                other => CloudCmdError::ClientCreation(other.to_string()),
            })?;

        self.counters.clients_created.fetch_add(1, Ordering::Relaxed);
        *self.client.lock() =
            Some(ClientSlot { tenant: resolved, retry: retry.copied(), client: Arc::clone(&client) });
        Ok(client)
    }

    pub fn stats(&self) -> CacheStats {
        let c = &self.counters;
        CacheStats {
            credential_hits: c.credential_hits.load(Ordering::Relaxed),
            credential_misses: c.credential_misses.load(Ordering::Relaxed),
            credentials_created: c.credentials_created.load(Ordering::Relaxed),
            client_hits: c.client_hits.load(Ordering::Relaxed),
            client_misses: c.client_misses.load(Ordering::Relaxed),
            clients_created: c.clients_created.load(Ordering::Relaxed),
        }
    }

    async fn credential_for(&self, resolved: Option<String>) -> Result<Arc<F::Credential>> {
        if let Some(credential) = self.cached_credential(resolved.as_deref()) {
            self.counters.credential_hits.fetch_add(1, Ordering::Relaxed);
            debug!(cache = "credential", tenant = ?resolved, "credential cache hit");
            return Ok(credential);
        }
        self.counters.credential_misses.fetch_add(1, Ordering::Relaxed);
        debug!(cache = "credential", tenant = ?resolved, "credential cache miss");

        let credential = self
            .factory
            .create_credential(resolved.as_deref())
            .await
            .map(Arc::new)
            .map_err(|err| match err {
                CloudCmdError::CredentialCreation(_) => err,
                other => CloudCmdError::CredentialCreation(other.to_string()),
            })?;

        self.counters.credentials_created.fetch_add(1, Ordering::Relaxed);
        *self.credential.lock() =
            Some(CredentialSlot { tenant: resolved, credential: Arc::clone(&credential) });
        Ok(credential)
    }

    fn cached_credential(&self, tenant: Option<&str>) -> Option<Arc<F::Credential>> {
        self.credential
            .lock()
            .as_ref()
            .filter(|slot| slot.tenant.as_deref() == tenant)
            .map(|slot| Arc::clone(&slot.credential))
    }

    fn cached_client(&self, tenant: Option<&str>, retry: Option<&RetryPolicy>) -> Option<Arc<F::Client>> {
        self.client
            .lock()
            .as_ref()
            .filter(|slot| {
                slot.tenant.as_deref() == tenant && RetryPolicy::are_equal(slot.retry.as_ref(), retry)
            })
            .map(|slot| Arc::clone(&slot.client))
    }
}
