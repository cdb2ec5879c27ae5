use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{KustoService, ResourceScope};
use cloudcmd_domain::{KustoCluster, Result};
use serde::Deserialize;

use super::{ArmContext, Sku};
use crate::arm::ResourceLocator;

const API_VERSION: &str = "2023-08-15";
const RESOURCE_TYPE: &str = "Microsoft.Kusto/clusters";

#[derive(Deserialize)]
struct ClusterResource {
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    sku: Option<Sku>,
    #[serde(default)]
    properties: ClusterProperties,
}

#[derive(Default, Deserialize)]
struct ClusterProperties {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl From<ClusterResource> for KustoCluster {
    fn from(resource: ClusterResource) -> Self {
        Self {
            name: resource.name,
            location: resource.location,
            cluster_uri: resource.properties.uri,
            state: resource.properties.state,
            sku_name: resource.sku.and_then(|sku| sku.name),
        }
    }
}

pub struct KustoAdapter {
    context: Arc<ArmContext>,
}

impl KustoAdapter {
    pub const fn new(context: Arc<ArmContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl KustoService for KustoAdapter {
    async fn list_clusters(&self, scope: &ResourceScope) -> Result<Vec<KustoCluster>> {
        let (client, subscription) = self.context.connect(scope).await?;
        let path = format!("/subscriptions/{subscription}/providers/{RESOURCE_TYPE}");
        let clusters: Vec<ClusterResource> = client.list(&path, API_VERSION, &[]).await?;
        Ok(clusters.into_iter().map(KustoCluster::from).collect())
    }

    async fn get_cluster(
        &self,
        scope: &ResourceScope,
        cluster_name: &str,
    ) -> Result<Option<KustoCluster>> {
        let (client, subscription) = self.context.connect(scope).await?;
        let id = ResourceLocator::new(&client, &subscription).find(RESOURCE_TYPE, cluster_name).await?;
        let cluster: Option<ClusterResource> = client.get_optional(&id, API_VERSION).await?;
        Ok(cluster.map(KustoCluster::from))
    }
}
