//! Integration tests for the single-slot credential/client cache

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use cloudcmd_domain::{CloudCmdError, RetryMode, RetryPolicy};
use support::clients::{cache_with, policy, MockFactory, CONTOSO_ID, FABRIKAM_ID};

/// Test that structurally equal keys return the same client instance
///
/// Verifies:
/// - Second call is a hit (`Arc::ptr_eq`)
/// - Only one credential and one client are constructed
#[tokio::test]
async fn test_same_tenant_and_policy_reuses_client() {
    let (cache, _) = cache_with(MockFactory::default());
    let retry = policy(4);

    let first = cache.management_client(Some(CONTOSO_ID), Some(&retry)).await.unwrap();
    let again = cache.management_client(Some(CONTOSO_ID), Some(&policy(4))).await.unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    let stats = cache.stats();
    assert_eq!(stats.clients_created, 1);
    assert_eq!(stats.credentials_created, 1);
    assert_eq!(stats.client_hits, 1);
}

/// Test that two absent policies count as equal
#[tokio::test]
async fn test_absent_policies_reuse_client() {
    let (cache, resolver) = cache_with(MockFactory::default());

    let first = cache.management_client(None, None).await.unwrap();
    let again = cache.management_client(None, None).await.unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    assert!(first.tenant.is_none());
    assert!(first.retry.is_none());
    // no tenant means no resolution
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

/// Test that changing any single retry field forces a new client
///
/// Verifies:
/// - A new client per changed policy
/// - The credential is reused because the tenant did not change
#[tokio::test]
async fn test_policy_change_rebuilds_client_only() {
    let (cache, _) = cache_with(MockFactory::default());
    let base = policy(3);
    let changed = [
        RetryPolicy { delay_seconds: 2.0, ..base },
        RetryPolicy { max_delay_seconds: 10.0, ..base },
        RetryPolicy { max_retries: 9, ..base },
        RetryPolicy { mode: RetryMode::Fixed, ..base },
        RetryPolicy { network_timeout_seconds: 5.0, ..base },
    ];

    let mut previous = cache.management_client(Some(CONTOSO_ID), Some(&base)).await.unwrap();
    for retry in &changed {
        let next = cache.management_client(Some(CONTOSO_ID), Some(retry)).await.unwrap();
        assert!(!Arc::ptr_eq(&previous, &next), "{retry:?}");
        assert_eq!(next.retry, Some(*retry));
        assert_eq!(next.credential_serial, 1);
        previous = next;
    }

    let stats = cache.stats();
    assert_eq!(stats.clients_created, 6);
    assert_eq!(stats.credentials_created, 1);
}

/// Test that absent and present policies are different keys
#[tokio::test]
async fn test_absent_versus_present_policy() {
    let (cache, _) = cache_with(MockFactory::default());

    let defaults = cache.management_client(None, None).await.unwrap();
    let explicit = cache.management_client(None, Some(&RetryPolicy::default())).await.unwrap();

    assert!(!Arc::ptr_eq(&defaults, &explicit));
}

/// Test that a tenant change replaces both slots
#[tokio::test]
async fn test_tenant_change_rebuilds_credential_and_client() {
    let (cache, _) = cache_with(MockFactory::default());

    let contoso = cache.management_client(Some(CONTOSO_ID), None).await.unwrap();
    let fabrikam = cache.management_client(Some(FABRIKAM_ID), None).await.unwrap();
    let contoso_again = cache.management_client(Some(CONTOSO_ID), None).await.unwrap();

    assert_eq!(fabrikam.tenant.as_deref(), Some(FABRIKAM_ID));
    assert!(!Arc::ptr_eq(&contoso, &fabrikam));
    // single slot: the first entry was discarded
    assert!(!Arc::ptr_eq(&contoso, &contoso_again));
    assert_eq!(cache.stats().credentials_created, 3);
}

/// Test that names and ids resolving to one tenant share the cache entry
#[tokio::test]
async fn test_resolution_is_the_cache_key() {
    let (cache, resolver) = cache_with(MockFactory::default());

    let by_name = cache.management_client(Some("contoso.onmicrosoft.com"), None).await.unwrap();
    let by_id = cache.management_client(Some(CONTOSO_ID), None).await.unwrap();

    assert!(Arc::ptr_eq(&by_name, &by_id));
    assert_eq!(by_name.tenant.as_deref(), Some(CONTOSO_ID));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
}

/// Test that unknown tenants fail before any construction
#[tokio::test]
async fn test_unknown_tenant_propagates() {
    let (cache, _) = cache_with(MockFactory::default());

    let err = cache.management_client(Some("unknown.example"), None).await.unwrap_err();

    assert!(matches!(err, CloudCmdError::NotFound(_)));
    assert_eq!(cache.stats().credential_misses, 0);
}

/// Test credential construction failure wrapping
///
/// Verifies:
/// - Failure surfaces as `CredentialCreation` with the cause's message
/// - The previously cached credential survives
#[tokio::test]
async fn test_credential_failure_is_wrapped_and_slot_kept() {
    let (cache, _) = cache_with(MockFactory::default());
    let good = cache.credential(Some(CONTOSO_ID)).await.unwrap();

    cache.factory().fail_credentials.store(true, Ordering::SeqCst);
    let err = cache.credential(Some(FABRIKAM_ID)).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to get credential: no credential source configured"
    );

    let still_cached = cache.credential(Some(CONTOSO_ID)).await.unwrap();
    assert!(Arc::ptr_eq(&good, &still_cached));
}

/// Test client construction failure wrapping
#[tokio::test]
async fn test_client_failure_is_wrapped() {
    let (cache, _) = cache_with(MockFactory::default());
    cache.factory().fail_clients.store(true, Ordering::SeqCst);

    let err = cache.management_client(None, None).await.unwrap_err();
    assert!(matches!(err, CloudCmdError::ClientCreation(_)));
    assert!(err.to_string().contains("invalid management endpoint"));

    cache.factory().fail_clients.store(false, Ordering::SeqCst);
    let client = cache.management_client(None, None).await.unwrap();
    assert_eq!(client.serial, 1);
}

/// Test the shared header policy reaches every client
#[tokio::test]
async fn test_header_policy_applied() {
    let (cache, _) = cache_with(MockFactory::default());
    let client = cache.management_client(None, None).await.unwrap();
    assert!(client.user_agent.starts_with("cloudcmd/0.0.0-test ("));
    assert_eq!(client.user_agent, cache.header_policy().user_agent());
}

/// Test concurrent access with alternating keys
///
/// Verifies:
/// - Every caller gets a client matching its own key
/// - The slot is never observed half-written
/// - A follow-up call hits for whichever key finished last
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access_stays_consistent() {
    let (cache, _) = cache_with(MockFactory::slow(Duration::from_millis(2)));

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                let (tenant, retries) = if i % 2 == 0 { (CONTOSO_ID, 1) } else { (FABRIKAM_ID, 2) };
                let retry = policy(retries);
                let client = cache.management_client(Some(tenant), Some(&retry)).await.unwrap();
                (tenant, retries, client)
            })
        })
        .collect();

    for task in futures::future::join_all(tasks).await {
        let (tenant, retries, client) = task.unwrap();
        assert_eq!(client.tenant.as_deref(), Some(tenant));
        assert_eq!(client.retry.map(|r| r.max_retries), Some(retries));
    }

    let last = cache.management_client(Some(CONTOSO_ID), Some(&policy(1))).await.unwrap();
    let hit = cache.management_client(Some(CONTOSO_ID), Some(&policy(1))).await.unwrap();
    assert!(Arc::ptr_eq(&last, &hit));
}
