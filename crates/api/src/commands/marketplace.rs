//! `marketplace` commands

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::options::common;
use cloudcmd_core::utils::results::item_result;
use cloudcmd_core::{
    BoundOptions, Command, CommandContext, MarketplaceService, OptionDefinition, RegistryBuilder,
    RegistryError,
};
use cloudcmd_domain::{Result, RetryPolicy};
use serde_json::Value;

pub const PRODUCT_ID: OptionDefinition =
    OptionDefinition::string("product-id", "Unique identifier of the marketplace product.")
        .required();

pub(crate) fn register(
    builder: &mut RegistryBuilder,
    service: Arc<dyn MarketplaceService>,
    default_retry: Option<RetryPolicy>,
) -> std::result::Result<(), RegistryError> {
    builder
        .group(&["marketplace"], "Marketplace operations.")?
        .group(&["marketplace", "product"], "Marketplace product operations.")?
        .register_in(
            &["marketplace", "product"],
            Arc::new(ProductGetCommand::new(service, default_retry)),
        )?;
    Ok(())
}

/// `marketplace product get --product-id <id>`
pub struct ProductGetCommand {
    service: Arc<dyn MarketplaceService>,
    default_retry: Option<RetryPolicy>,
}

impl ProductGetCommand {
    pub fn new(service: Arc<dyn MarketplaceService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for ProductGetCommand {
    fn name(&self) -> &str {
        "get"
    }

    fn description(&self) -> &str {
        "Get a marketplace product with its publisher, summary and plans."
    }

    fn title(&self) -> &str {
        "Get Marketplace Product"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        super::area_options(&[PRODUCT_ID])
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        let scope = common::resource_scope(options, self.default_retry)?;
        let product_id = options.require_str(PRODUCT_ID.name)?;

        let product = self.service.get_product(&scope, product_id).await?;
        item_result("product", Some(&product))
    }
}
