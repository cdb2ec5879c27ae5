//! `storage` commands

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::options::common;
use cloudcmd_core::utils::results::collection_result;
use cloudcmd_core::{
    BoundOptions, Command, CommandContext, OptionDefinition, RegistryBuilder, RegistryError,
    StorageService,
};
use cloudcmd_domain::{Result, RetryPolicy};
use serde_json::Value;

pub(crate) fn register(
    builder: &mut RegistryBuilder,
    service: Arc<dyn StorageService>,
    default_retry: Option<RetryPolicy>,
) -> std::result::Result<(), RegistryError> {
    builder
        .group(&["storage"], "Storage operations - commands for Azure Storage accounts.")?
        .group(&["storage", "account"], "Storage account operations.")?
        .register_in(
            &["storage", "account"],
            Arc::new(AccountListCommand::new(service, default_retry)),
        )?;
    Ok(())
}

/// `storage account list`
pub struct AccountListCommand {
    service: Arc<dyn StorageService>,
    default_retry: Option<RetryPolicy>,
}

impl AccountListCommand {
    pub fn new(service: Arc<dyn StorageService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for AccountListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "List all Storage accounts in a subscription. Returns the account names with their \
         location, kind and SKU. Requires --subscription."
    }

    fn title(&self) -> &str {
        "List Storage Accounts"
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
