use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{MarketplaceService, ResourceScope};
use cloudcmd_domain::{MarketplaceProduct, Result};

use super::ArmContext;

const API_VERSION: &str = "2023-01-01-preview";

pub struct MarketplaceAdapter {
    context: Arc<ArmContext>,
}

impl MarketplaceAdapter {
    pub const fn new(context: Arc<ArmContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl MarketplaceService for MarketplaceAdapter {
    /// The product payload already uses the public field names
    async fn get_product(&self, scope: &ResourceScope, product_id: &str) -> Result<MarketplaceProduct> {
        let (client, subscription) = self.context.connect(scope).await?;
        let path = format!(
            "/subscriptions/{subscription}/providers/Microsoft.Marketplace/products/{}",
            urlencoding::encode(product_id)
        );
        client.get(&path, API_VERSION).await
    }
}
