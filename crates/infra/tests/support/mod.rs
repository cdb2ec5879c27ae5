//! Shared fixtures for infrastructure tests
#![allow(dead_code)]

use std::sync::Arc;

use cloudcmd_core::{HeaderPolicy, ResourceClientCache, ResourceScope};
use cloudcmd_domain::{Config, RetryMode, RetryPolicy};
use cloudcmd_infra::{ArmClientFactory, ArmContext, ArmTenantResolver, CredentialSettings};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SUBSCRIPTION_ID: &str = "0b1f6471-1bf0-4dda-aec3-111122223333";
pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";

/// Management API double plus a context wired against it
pub struct ArmFixture {
    pub server: MockServer,
    pub factory: ArmClientFactory,
    pub context: Arc<ArmContext>,
}

impl ArmFixture {
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        let mut config = Config::default();
        config.management.endpoint = server.uri();
        config.auth.authority_host = server.uri();
        config.auth.scope = Some("https://management.azure.com/.default".into());

        let settings = CredentialSettings {
            authority_host: server.uri(),
            access_token: Some(TOKEN.into()),
            ..CredentialSettings::default()
        };
        let factory = ArmClientFactory::new(&config, settings).expect("factory");
        let header_policy = Arc::new(HeaderPolicy::for_application());
        let tenants = ArmTenantResolver::new(factory.clone(), Arc::clone(&header_policy));
        let cache =
            Arc::new(ResourceClientCache::new(factory.clone(), Arc::new(tenants), header_policy));

        Self { server, factory, context: Arc::new(ArmContext::new(cache)) }
    }

    /// Scope for the fixture subscription with a retry policy that never sleeps
    pub fn scope(&self) -> ResourceScope {
        ResourceScope { retry_policy: Some(fast_policy(1)), ..ResourceScope::new(SUBSCRIPTION_ID) }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Answer the resource lookup for `name` with a resource-group scoped id
    pub async fn mount_resource(&self, resource_type: &str, name: &str) -> String {
        let id = format!(
            "/subscriptions/{SUBSCRIPTION_ID}/resourceGroups/rg1/providers/{resource_type}/{name}"
        );
        Mock::given(method("GET"))
            .and(path(sub_path("/resources")))
            .and(query_param(
                "$filter",
                format!(
                    "resourceType eq '{resource_type}' and name eq '{}'",
                    name.replace('\'', "''")
                ),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![json!({
                "id": id,
                "name": name,
                "type": resource_type,
            })])))
            .mount(&self.server)
            .await;
        id
    }

    /// Mount a GET returning `body` for `path`, requiring the bearer token
    pub async fn mount_get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("authorization", BEARER))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

pub fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        delay_seconds: 0.0,
        max_delay_seconds: 0.0,
        max_retries,
        mode: RetryMode::Fixed,
        network_timeout_seconds: 10.0,
    }
}

pub fn sub_path(suffix: &str) -> String {
    format!("/subscriptions/{SUBSCRIPTION_ID}{suffix}")
}

pub fn page(items: Vec<Value>) -> Value {
    json!({ "value": items })
}

pub fn arm_error(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}
