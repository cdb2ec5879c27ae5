//! Scripted command for pipeline tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_core::options::common;
use cloudcmd_core::{BoundOptions, Command, CommandContext, OptionDefinition};
use cloudcmd_domain::Result;
use serde_json::Value;

type Script = Box<dyn Fn(&BoundOptions) -> Result<Option<Value>> + Send + Sync>;

/// Command whose body is a closure; counts how often the body ran.
pub struct ScriptedCommand {
    name: &'static str,
    extra: Vec<OptionDefinition>,
    script: Script,
    pub executions: AtomicUsize,
}

impl ScriptedCommand {
    pub fn new<F>(name: &'static str, script: F) -> Self
    where
        F: Fn(&BoundOptions) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self { name, extra: Vec::new(), script: Box::new(script), executions: AtomicUsize::new(0) }
    }

    pub fn with_option(mut self, option: OptionDefinition) -> Self {
        self.extra.push(option);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn runs(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Command for ScriptedCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Scripted test command"
    }

    fn title(&self) -> &str {
        "Scripted"
    }

    fn options(&self) -> Vec<OptionDefinition> {
        let mut options = common::subscription_options();
        options.extend(self.extra.iter().copied());
        options
    }

    async fn execute(&self, _context: &CommandContext, options: &BoundOptions) -> Result<Option<Value>> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        (self.script)(options)
    }
}
