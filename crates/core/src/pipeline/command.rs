//! The capability every leaf command implements

use std::fmt;

use async_trait::async_trait;
use cloudcmd_common::validation::ValidationResult;
use cloudcmd_domain::{CommandMetadata, Result};
use serde_json::Value;
use uuid::Uuid;

use crate::options::{common, BoundOptions, OptionDefinition};

/// Per-invocation context handed to a command body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub invocation_id: Uuid,
    /// Space-separated command path
    pub command: String,
}

impl CommandContext {
    pub fn new(command: impl Into<String>) -> Self {
        Self { invocation_id: Uuid::new_v4(), command: command.into() }
    }
}

/// A leaf command: describe, validate, execute
///
/// The registry only ever holds this capability, never a concrete type.
#[async_trait]
pub trait Command: Send + Sync {
    /// Leaf name, unique among its siblings
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Short human-readable title
    fn title(&self) -> &str;

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata::read_only()
    }

    /// Options this command accepts
    fn options(&self) -> Vec<OptionDefinition>;

    /// Cross-field rules, checked after required options are present
    ///
    /// The default validates the shared `--retry-*` options.
    fn validate(&self, options: &BoundOptions) -> ValidationResult<()> {
        common::validate_retry(options)
    }

    /// Run the command body
    ///
    /// `Ok(None)` is a success without results (for example an empty
    /// collection).
    async fn execute(&self, context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>>;
}

impl fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("name", &self.name()).finish()
    }
}
