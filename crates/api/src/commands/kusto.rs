//! `kusto` commands

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::options::common;
use cloudcmd_core::utils::results::{collection_result, item_result};
use cloudcmd_core::{
    BoundOptions, Command, CommandContext, KustoService, OptionDefinition, RegistryBuilder,
    RegistryError,
};
use cloudcmd_domain::{Result, RetryPolicy};
use serde_json::Value;

pub const CLUSTER_NAME: OptionDefinition =
    OptionDefinition::string("cluster-name", "Name of the Kusto cluster.").required();

pub(crate) fn register(
    builder: &mut RegistryBuilder,
    service: Arc<dyn KustoService>,
    default_retry: Option<RetryPolicy>,
) -> std::result::Result<(), RegistryError> {
    let group = ["kusto", "cluster"];
    builder
        .group(&["kusto"], "Azure Data Explorer (Kusto) operations.")?
        .group(&group, "Kusto cluster operations.")?
        .register_in(
            &group,
            Arc::new(ClusterListCommand::new(Arc::clone(&service), default_retry)),
        )?
        .register_in(&group, Arc::new(ClusterGetCommand::new(service, default_retry)))?;
    Ok(())
}

/// `kusto cluster list`
pub struct ClusterListCommand {
    service: Arc<dyn KustoService>,
    default_retry: Option<RetryPolicy>,
}

impl ClusterListCommand {
    pub fn new(service: Arc<dyn KustoService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for ClusterListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "List all Kusto clusters in a subscription."
    }

    fn title(&self) -> &str {
        "List Kusto Clusters"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        super::area_options(&[])
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        let scope = common::resource_scope(options, self.default_retry)?;
        let clusters = self.service.list_clusters(&scope).await?;
        collection_result("clusters", &clusters)
    }
}

/// `kusto cluster get --cluster-name <name>`
pub struct ClusterGetCommand {
    service: Arc<dyn KustoService>,
    default_retry: Option<RetryPolicy>,
}

impl ClusterGetCommand {
    pub fn new(service: Arc<dyn KustoService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for ClusterGetCommand {
    fn name(&self) -> &str {
        "get"
    }

    fn description(&self) -> &str {
        "Get the details of one Kusto cluster, including its query URI and provisioning \
         state."
    }

    fn title(&self) -> &str {
        "Get Kusto Cluster"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        super::area_options(&[CLUSTER_NAME])
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        let scope = common::resource_scope(options, self.default_retry)?;
        let name = options.require_str(CLUSTER_NAME.name)?;
        let cluster = self.service.get_cluster(&scope, name).await?;
        item_result("cluster", cluster.as_ref())
    }
}
