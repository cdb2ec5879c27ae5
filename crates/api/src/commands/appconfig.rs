//! `appconfig` commands

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::options::common;
use cloudcmd_core::utils::results::collection_result;
use cloudcmd_core::{
    AppConfigService, BoundOptions, Command, CommandContext, OptionDefinition, RegistryBuilder,
    RegistryError,
};
use cloudcmd_domain::{Result, RetryPolicy};
use serde_json::Value;

pub(crate) fn register(
    builder: &mut RegistryBuilder,
    service: Arc<dyn AppConfigService>,
    default_retry: Option<RetryPolicy>,
) -> std::result::Result<(), RegistryError> {
    builder
        .group(&["appconfig"], "App Configuration operations.")?
        .group(&["appconfig", "account"], "App Configuration store operations.")?
        .register_in(
            &["appconfig", "account"],
            Arc::new(AccountListCommand::new(service, default_retry)),
        )?;
    Ok(())
}

/// `appconfig account list`
pub struct AccountListCommand {
    service: Arc<dyn AppConfigService>,
    default_retry: Option<RetryPolicy>,
}

impl AccountListCommand {
    pub fn new(service: Arc<dyn AppConfigService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for AccountListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "List all App Configuration stores in a subscription, with their location, endpoint \
         and SKU."
    }

    fn title(&self) -> &str {
        "List App Configuration Stores"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        super::area_options(&[])
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        let scope = common::resource_scope(options, self.default_retry)?;
        let accounts = self.service.list_accounts(&scope).await?;
        collection_result("accounts", &accounts)
    }
}
