use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::{ResourceScope, ServiceBusService};
use cloudcmd_domain::{QueueDetails, Result, TopicDetails};
use serde::Deserialize;

use super::ArmContext;
use crate::arm::{ArmClient, ResourceLocator};

const API_VERSION: &str = "2021-11-01";
const NAMESPACE_TYPE: &str = "Microsoft.ServiceBus/namespaces";

#[derive(Deserialize)]
struct Entity<P> {
    name: String,
    properties: P,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CountDetails {
    active_message_count: Option<i64>,
    dead_letter_message_count: Option<i64>,
    scheduled_message_count: Option<i64>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QueueProperties {
    status: Option<String>,
    default_message_time_to_live: Option<String>,
    lock_duration: Option<String>,
    max_delivery_count: Option<i64>,
    max_size_in_megabytes: Option<i64>,
    requires_session: Option<bool>,
    count_details: CountDetails,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TopicProperties {
    status: Option<String>,
    default_message_time_to_live: Option<String>,
    max_message_size_in_kilobytes: Option<i64>,
    size_in_bytes: Option<i64>,
    subscription_count: Option<i64>,
    enable_partitioning: Option<bool>,
    max_size_in_megabytes: Option<i64>,
    count_details: CountDetails,
}

impl From<Entity<QueueProperties>> for QueueDetails {
    fn from(queue: Entity<QueueProperties>) -> Self {
        let p = queue.properties;
        Self {
            name: queue.name,
            status: p.status,
            default_message_time_to_live: p.default_message_time_to_live,
            lock_duration: p.lock_duration,
            max_delivery_count: p.max_delivery_count,
            max_size_in_megabytes: p.max_size_in_megabytes,
            requires_session: p.requires_session,
            active_message_count: p.count_details.active_message_count,
            dead_letter_message_count: p.count_details.dead_letter_message_count,
        }
    }
}

impl From<Entity<TopicProperties>> for TopicDetails {
    fn from(topic: Entity<TopicProperties>) -> Self {
        let p = topic.properties;
        Self {
            name: topic.name,
            status: p.status,
            default_message_time_to_live: p.default_message_time_to_live,
            max_message_size_in_kilobytes: p.max_message_size_in_kilobytes,
            size_in_bytes: p.size_in_bytes,
            subscription_count: p.subscription_count,
            enable_partitioning: p.enable_partitioning,
            max_size_in_megabytes: p.max_size_in_megabytes,
            scheduled_message_count: p.count_details.scheduled_message_count,
        }
    }
}

pub struct ServiceBusAdapter {
    context: Arc<ArmContext>,
}

impl ServiceBusAdapter {
    pub const fn new(context: Arc<ArmContext>) -> Self {
        Self { context }
    }

    async fn entity_path(
        client: &ArmClient,
        subscription: &str,
        namespace: &str,
        collection: &str,
        name: &str,
    ) -> Result<String> {
        let id = ResourceLocator::new(client, subscription).find(NAMESPACE_TYPE, namespace).await?;
        Ok(format!("{id}/{collection}/{}", urlencoding::encode(name)))
    }
}

#[async_trait]
impl ServiceBusService for ServiceBusAdapter {
    async fn get_queue_details(
        &self,
        scope: &ResourceScope,
        namespace: &str,
        queue_name: &str,
    ) -> Result<QueueDetails> {
        let (client, subscription) = self.context.connect(scope).await?;
        let path = Self::entity_path(&client, &subscription, namespace, "queues", queue_name).await?;
        let queue: Entity<QueueProperties> = client.get(&path, API_VERSION).await?;
        Ok(queue.into())
    }

    async fn get_topic_details(
        &self,
        scope: &ResourceScope,
        namespace: &str,
        topic_name: &str,
    ) -> Result<TopicDetails> {
        let (client, subscription) = self.context.connect(scope).await?;
        let path = Self::entity_path(&client, &subscription, namespace, "topics", topic_name).await?;
        let topic: Entity<TopicProperties> = client.get(&path, API_VERSION).await?;
        Ok(topic.into())
    }
}
