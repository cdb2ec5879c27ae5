//! Leaf commands, one module per resource area
//!
//! Every command is a thin adapter: it builds a [`ResourceScope`] from the
//! shared options, calls its area's service port and shapes the result.
//!
//! [`ResourceScope`]: cloudcmd_core::ResourceScope

use std::sync::Arc;

use cloudcmd_core::options::common;
use cloudcmd_core::{
    AppConfigService, KeyVaultService, KustoService, MarketplaceService, OptionDefinition,
    RegistryBuilder, RegistryError, ServiceBusService, StorageService,
};
use cloudcmd_domain::RetryPolicy;

pub mod appconfig;
pub mod keyvault;
pub mod kusto;
pub mod marketplace;
pub mod servicebus;
pub mod storage;

/// Service ports the area commands are composed with
#[derive(Clone)]
pub struct AreaServices {
    pub storage: Arc<dyn StorageService>,
    pub appconfig: Arc<dyn AppConfigService>,
    pub kusto: Arc<dyn KustoService>,
    pub servicebus: Arc<dyn ServiceBusService>,
    pub keyvault: Arc<dyn KeyVaultService>,
    pub marketplace: Arc<dyn MarketplaceService>,
}

/// Register every area's groups and leaves
///
/// `default_retry` is the process-wide policy used when an invocation
/// supplies no `--retry-*` option.
///
/// # Errors
/// Any registration conflict; this indicates a programming error.
pub fn register_all(
    builder: &mut RegistryBuilder,
    services: &AreaServices,
    default_retry: Option<RetryPolicy>,
) -> Result<(), RegistryError> {
    storage::register(builder, Arc::clone(&services.storage), default_retry)?;
    appconfig::register(builder, Arc::clone(&services.appconfig), default_retry)?;
    kusto::register(builder, Arc::clone(&services.kusto), default_retry)?;
    servicebus::register(builder, Arc::clone(&services.servicebus), default_retry)?;
    keyvault::register(builder, Arc::clone(&services.keyvault), default_retry)?;
    marketplace::register(builder, Arc::clone(&services.marketplace), default_retry)?;
    Ok(())
}

/// Subscription, tenant and retry options followed by `extra`
fn area_options(extra: &[OptionDefinition]) -> Vec<OptionDefinition> {
    let mut options = common::subscription_options();
    options.extend_from_slice(extra);
    options
}
