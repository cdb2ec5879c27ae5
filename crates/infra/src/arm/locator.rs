//! Name-to-id lookups within a subscription

use std::collections::HashMap;

use cloudcmd_domain::{is_guid, CloudCmdError, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use super::ArmClient;

const RESOURCES_API_VERSION: &str = "2021-04-01";
const SUBSCRIPTIONS_API_VERSION: &str = "2022-12-01";

#[derive(Deserialize)]
struct GenericResource {
    id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Subscription {
    subscription_id: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Finds resource ids by type and name
pub struct ResourceLocator<'a> {
    client: &'a ArmClient,
    subscription_id: &'a str,
}

impl<'a> ResourceLocator<'a> {
    pub const fn new(client: &'a ArmClient, subscription_id: &'a str) -> Self {
        Self { client, subscription_id }
    }

    /// Full resource id of the `resource_type` named `name`
    ///
    /// # Errors
    /// `NotFound` when the subscription holds no such resource.
    pub async fn find(&self, resource_type: &str, name: &str) -> Result<String> {
        let filter = format!(
            "resourceType eq '{}' and name eq '{}'",
            odata_literal(resource_type),
            odata_literal(name)
        );
        let path = format!("/subscriptions/{}/resources", self.subscription_id);
        let resources: Vec<GenericResource> =
            self.client.list(&path, RESOURCES_API_VERSION, &[("$filter", &filter)]).await?;

        resources
            .into_iter()
            .find(|resource| resource.name.eq_ignore_ascii_case(name))
            .map(|resource| resource.id)
            .ok_or_else(|| {
                CloudCmdError::NotFound(format!(
                    "Resource '{name}' of type '{resource_type}' not found in subscription '{}'",
                    self.subscription_id
                ))
            })
    }
}

/// Quote-escape a value for a single-quoted OData string literal
fn odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Resolves subscription display names to ids, remembering every answer
///
/// Answers are remembered per tenant: the same display name may name
/// different subscriptions in different tenants.
#[derive(Default)]
pub struct SubscriptionResolver {
    known: Mutex<HashMap<(String, String), String>>,
}

impl SubscriptionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// GUIDs pass through untouched; names are looked up in the tenant the
    /// client's credential is bound to
    pub async fn resolve(&self, client: &ArmClient, subscription: &str) -> Result<String> {
        if is_guid(subscription) {
            return Ok(subscription.to_string());
        }

        let tenant = client.credential().tenant().unwrap_or_default().to_ascii_lowercase();
        let key = (tenant, subscription.to_ascii_lowercase());
        if let Some(id) = self.known.lock().get(&key) {
            return Ok(id.clone());
        }

        let subscriptions: Vec<Subscription> =
            client.list("/subscriptions", SUBSCRIPTIONS_API_VERSION, &[]).await?;
        let id = subscriptions
            .into_iter()
            .find(|s| s.display_name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(subscription)))
            .map(|s| s.subscription_id)
            .ok_or_else(|| CloudCmdError::NotFound(format!("Subscription '{subscription}' not found")))?;

        debug!(tenant = %key.0, subscription, %id, "resolved subscription name");
        self.known.lock().insert(key, id.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odata_literal_doubles_quotes() {
        assert_eq!(odata_literal("o'brien"), "o''brien");
        assert_eq!(odata_literal("''"), "''''");
        assert_eq!(odata_literal("plain-name"), "plain-name");
    }
}
