//! `keyvault` commands

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::options::common;
use cloudcmd_core::utils::results::collection_result;
use cloudcmd_core::{
    BoundOptions, Command, CommandContext, KeyVaultService, OptionDefinition, RegistryBuilder,
    RegistryError,
};
use cloudcmd_domain::{Result, RetryPolicy};
use serde_json::Value;

pub const VAULT: OptionDefinition =
    OptionDefinition::string("vault", "Name of the Key Vault.").required();

pub const INCLUDE_MANAGED: OptionDefinition = OptionDefinition::boolean(
    "include-managed",
    "Also list keys managed by Key Vault (for example certificate backing keys).",
);

pub(crate) fn register(
    builder: &mut RegistryBuilder,
    service: Arc<dyn KeyVaultService>,
    default_retry: Option<RetryPolicy>,
) -> std::result::Result<(), RegistryError> {
    builder
        .group(&["keyvault"], "Key Vault operations.")?
        .group(&["keyvault", "key"], "Key Vault key operations.")?
        .register_in(&["keyvault", "key"], Arc::new(KeyListCommand::new(service, default_retry)))?;
    Ok(())
}

/// `keyvault key list --vault <name> [--include-managed]`
pub struct KeyListCommand {
    service: Arc<dyn KeyVaultService>,
    default_retry: Option<RetryPolicy>,
}

impl KeyListCommand {
    pub fn new(service: Arc<dyn KeyVaultService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for KeyListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "List the keys in a Key Vault. Managed keys are omitted unless --include-managed is set."
    }

    fn title(&self) -> &str {
        "List Key Vault Keys"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        super::area_options(&[VAULT, INCLUDE_MANAGED])
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        let scope = common::resource_scope(options, self.default_retry)?;
        let vault = options.require_str(VAULT.name)?;
        let include_managed = options.flag(INCLUDE_MANAGED.name);

        let keys = self.service.list_keys(&scope, vault, include_managed).await?;
        collection_result("keys", &keys)
    }
}
