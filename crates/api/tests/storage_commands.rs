//! Integration tests for the `storage account list` command.

mod support;

use cloudcmd_core::RawArgs;
use cloudcmd_domain::{CloudCmdError, Config, RetryMode, RetryPolicy, StorageAccount};
use serde_json::json;
use serial_test::serial;
use support::{context, context_with, env_with, MockAreas, SUBSCRIPTION_ID};

const PATH: [&str; 3] = ["storage", "account", "list"];

fn account(name: &str) -> StorageAccount {
    StorageAccount { name: name.to_string(), ..StorageAccount::default() }
}

/// Test that accounts come back in service order under the `accounts` key.
///
/// Verifies:
/// - Status 200 with the fixed success message
/// - Results preserve the order returned by the service
/// - The service saw the subscription and no retry policy
#[tokio::test]
async fn test_list_returns_accounts() {
    let mock = MockAreas::new();
    *mock.storage_accounts.lock() = Some(Ok(vec![account("account1"), account("account2")]));
    let ctx = context(&mock);

    let execution =
        ctx.invoke(&PATH, &RawArgs::new().with("subscription", SUBSCRIPTION_ID)).await;

    assert_eq!(execution.response.status, 200);
    assert_eq!(execution.response.message, "Success");
    assert_eq!(
        execution.response.results,
        Some(json!({"accounts": [{"name": "account1"}, {"name": "account2"}]}))
    );

    let call = mock.last_call().expect("service called");
    assert_eq!(call.scope.subscription, SUBSCRIPTION_ID);
    assert!(call.scope.tenant.is_none());
    assert!(call.scope.retry_policy.is_none());
}

/// Test that an empty subscription yields a success without results.
#[tokio::test]
async fn test_list_empty_has_no_results() {
    let mock = MockAreas::new();
    *mock.storage_accounts.lock() = Some(Ok(Vec::new()));
    let ctx = context(&mock);

    let execution =
        ctx.invoke(&PATH, &RawArgs::new().with("subscription", SUBSCRIPTION_ID)).await;

    assert_eq!(execution.response.status, 200);
    assert!(execution.response.results.is_none());
    let encoded = serde_json::to_value(&execution.response).unwrap();
    assert!(encoded.get("results").is_none());
}

/// Test that failures from the service map onto response statuses.
///
/// Verifies:
/// - Unclassified remote errors become 500 and keep the remote text
/// - Unavailable becomes 503
/// - Not found becomes 404
#[tokio::test]
async fn test_list_maps_service_failures() {
    let cases = [
        (CloudCmdError::Remote("Service error".into()), 500, "Service error"),
        (CloudCmdError::Unavailable("Service Unavailable".into()), 503, "Service Unavailable"),
        (CloudCmdError::NotFound("Subscription 'x' not found".into()), 404, "not found"),
    ];

    for (error, status, text) in cases {
        let mock = MockAreas::new();
        *mock.storage_accounts.lock() = Some(Err(error));
        let ctx = context(&mock);

        let execution =
            ctx.invoke(&PATH, &RawArgs::new().with("subscription", SUBSCRIPTION_ID)).await;

        assert_eq!(execution.response.status, status);
        assert!(execution.response.message.contains(text), "{}", execution.response.message);
        assert!(execution.response.results.is_none());
    }
}

/// Test that a missing subscription is rejected before the service runs.
#[tokio::test]
async fn test_missing_subscription_is_bad_request() {
    let mock = MockAreas::new();
    let ctx = context(&mock);

    let execution = ctx.invoke(&PATH, &RawArgs::new()).await;

    assert_eq!(execution.response.status, 400);
    assert!(execution.response.message.to_lowercase().contains("required"));
    assert!(mock.calls().is_empty());
}

/// Test that `AZURE_SUBSCRIPTION_ID` from the process environment fills the
/// subscription when the option is omitted.
#[tokio::test]
#[serial]
async fn test_subscription_from_process_environment() {
    let mock = MockAreas::new();
    *mock.storage_accounts.lock() = Some(Ok(vec![account("account1")]));
    let ctx = cloudcmd_lib::AppContext::with_services(
        Config::default(),
        &mock.services(),
        cloudcmd_core::options::process_env(),
    )
    .unwrap();

    std::env::set_var("AZURE_SUBSCRIPTION_ID", "env-subs");
    let from_env = ctx.invoke(&PATH, &RawArgs::new()).await;
    let explicit = ctx.invoke(&PATH, &RawArgs::new().with("subscription", "option-subs")).await;
    std::env::remove_var("AZURE_SUBSCRIPTION_ID");

    assert_eq!(from_env.response.status, 200);
    assert_eq!(explicit.response.status, 200);
    let subscriptions: Vec<String> =
        mock.calls().into_iter().map(|call| call.scope.subscription).collect();
    assert_eq!(subscriptions, ["env-subs", "option-subs"]);
}

/// Test that retry options reach the service as a policy with library
/// defaults for the fields not supplied.
#[tokio::test]
async fn test_retry_options_build_policy() {
    let mock = MockAreas::new();
    *mock.storage_accounts.lock() = Some(Ok(vec![account("account1")]));
    let ctx = context(&mock);

    let raw = RawArgs::from_tokens([
        "--subscription",
        SUBSCRIPTION_ID,
        "--tenant",
        "contoso.onmicrosoft.com",
        "--retry-max-retries",
        "5",
        "--retry-mode",
        "fixed",
    ])
    .unwrap();
    let execution = ctx.invoke(&PATH, &raw).await;
    assert_eq!(execution.response.status, 200);

    let call = mock.last_call().unwrap();
    assert_eq!(call.scope.tenant.as_deref(), Some("contoso.onmicrosoft.com"));
    let policy = call.scope.retry_policy.expect("retry policy bound");
    assert_eq!(policy.max_retries, 5);
    assert_eq!(policy.mode, RetryMode::Fixed);
    assert!((policy.delay_seconds - 0.8).abs() < f64::EPSILON);
}

/// Test that the configured default retry policy applies only when the
/// invocation supplies none.
#[tokio::test]
async fn test_configured_retry_is_default() {
    let mock = MockAreas::new();
    *mock.storage_accounts.lock() = Some(Ok(vec![account("account1")]));
    let configured = RetryPolicy { max_retries: 1, ..RetryPolicy::default() };
    let config = Config { retry: Some(configured), ..Config::default() };
    let ctx = context_with(&mock, config, env_with(&[]));

    ctx.invoke(&PATH, &RawArgs::new().with("subscription", SUBSCRIPTION_ID)).await;
    ctx.invoke(
        &PATH,
        &RawArgs::new().with("subscription", SUBSCRIPTION_ID).with("retry-max-retries", "7"),
    )
    .await;

    let retries: Vec<u32> = mock
        .calls()
        .into_iter()
        .map(|call| call.scope.retry_policy.map_or(0, |p| p.max_retries))
        .collect();
    assert_eq!(retries, [1, 7]);
}

/// Test that an invalid retry option is a validation failure.
#[tokio::test]
async fn test_invalid_retry_option_rejected() {
    let mock = MockAreas::new();
    let ctx = context(&mock);

    let execution = ctx
        .invoke(
            &PATH,
            &RawArgs::new().with("subscription", SUBSCRIPTION_ID).with("retry-mode", "sometimes"),
        )
        .await;

    assert_eq!(execution.response.status, 400);
    assert!(execution.response.message.contains("sometimes"));
    assert!(mock.calls().is_empty());
}
