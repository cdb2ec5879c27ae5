//! `servicebus` commands
//!
//! Both leaves locate the namespace by name inside the subscription before
//! reading the entity, so a missing namespace and a missing entity both
//! surface as 404.

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::options::common;
use cloudcmd_core::utils::results::item_result;
use cloudcmd_core::{
    BoundOptions, Command, CommandContext, OptionDefinition, RegistryBuilder, RegistryError,
    ServiceBusService,
};
use cloudcmd_domain::{Result, RetryPolicy};
use serde_json::Value;

pub const NAMESPACE: OptionDefinition =
    OptionDefinition::string("namespace", "Service Bus namespace name.").required();

pub const QUEUE_NAME: OptionDefinition =
    OptionDefinition::string("queue-name", "Name of the queue.").required();

pub const TOPIC_NAME: OptionDefinition =
    OptionDefinition::string("topic-name", "Name of the topic.").required();

pub(crate) fn register(
    builder: &mut RegistryBuilder,
    service: Arc<dyn ServiceBusService>,
    default_retry: Option<RetryPolicy>,
) -> std::result::Result<(), RegistryError> {
    builder
        .group(&["servicebus"], "Service Bus operations.")?
        .group(&["servicebus", "queue"], "Service Bus queue operations.")?
        .group(&["servicebus", "topic"], "Service Bus topic operations.")?
        .register_in(
            &["servicebus", "queue"],
            Arc::new(QueueDetailsCommand::new(Arc::clone(&service), default_retry)),
        )?
        .register_in(
            &["servicebus", "topic"],
            Arc::new(TopicDetailsCommand::new(service, default_retry)),
        )?;
    Ok(())
}

/// `servicebus queue details`
pub struct QueueDetailsCommand {
    service: Arc<dyn ServiceBusService>,
    default_retry: Option<RetryPolicy>,
}

impl QueueDetailsCommand {
    pub fn new(service: Arc<dyn ServiceBusService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for QueueDetailsCommand {
    fn name(&self) -> &str {
        "details"
    }

    fn description(&self) -> &str {
        "Get the runtime details of a Service Bus queue: status, lock duration, delivery \
         limits and message counts."
    }

    fn title(&self) -> &str {
        "Get Service Bus Queue Details"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        super::area_options(&[NAMESPACE, QUEUE_NAME])
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        let scope = common::resource_scope(options, self.default_retry)?;
        let namespace = options.require_str(NAMESPACE.name)?;
        let queue = options.require_str(QUEUE_NAME.name)?;

        let details = self.service.get_queue_details(&scope, namespace, queue).await?;
        item_result("queueDetails", Some(&details))
    }
}

/// `servicebus topic details`
pub struct TopicDetailsCommand {
    service: Arc<dyn ServiceBusService>,
    default_retry: Option<RetryPolicy>,
}

impl TopicDetailsCommand {
    pub fn new(service: Arc<dyn ServiceBusService>, default_retry: Option<RetryPolicy>) -> Self {
        Self { service, default_retry }
    }
}

#[async_trait]
impl Command for TopicDetailsCommand {
    fn name(&self) -> &str {
        "details"
    }

    fn description(&self) -> &str {
        "Get the runtime details of a Service Bus topic, including its subscription count."
    }

    fn title(&self) -> &str {
        "Get Service Bus Topic Details"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        super::area_options(&[NAMESPACE, TOPIC_NAME])
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        let scope = common::resource_scope(options, self.default_retry)?;
        let namespace = options.require_str(NAMESPACE.name)?;
        let topic = options.require_str(TOPIC_NAME.name)?;

        let details = self.service.get_topic_details(&scope, namespace, topic).await?;
        item_result("topicDetails", Some(&details))
    }
}
