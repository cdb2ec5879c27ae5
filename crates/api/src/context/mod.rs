//! Application context - dependency injection container

use std::sync::Arc;
use std::time::{Duration, Instant};

use cloudcmd_core::options::{process_env, split_invocation, EnvLookup};
use cloudcmd_core::{CommandExecutor, CommandRegistry, Execution, HeaderPolicy, RawArgs};
use cloudcmd_domain::constants::STATUS_BAD_REQUEST;
use cloudcmd_domain::{CloudCmdError, CommandResponse, Config, Result};
use cloudcmd_infra::services::{
    AppConfigAdapter, ArmContext, KeyVaultAdapter, KustoAdapter, MarketplaceAdapter,
    ServiceBusAdapter, StorageAdapter,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::{register_all, AreaServices};
use crate::utils::logging::log_command_execution;

/// Application context - holds the registry, executor and configuration
///
/// Built once at startup; every invocation borrows it read-only, so one
/// context serves any number of concurrent requests.
pub struct AppContext {
    pub config: Config,
    pub executor: Arc<CommandExecutor>,
    // Keeps the shared client cache alive for the lifetime of the app
    arm: Option<Arc<ArmContext>>,
}

impl AppContext {
    /// Wire the management-plane adapters from configuration and the
    /// process environment
    ///
    /// # Errors
    /// When the credential settings or endpoints in `config` are unusable.
    pub fn new(config: Config) -> Result<Self> {
        let header_policy = Arc::new(HeaderPolicy::for_application());
        let arm = Arc::new(ArmContext::from_config(&config, header_policy)?);

        let services = AreaServices {
            storage: Arc::new(StorageAdapter::new(Arc::clone(&arm))),
            appconfig: Arc::new(AppConfigAdapter::new(Arc::clone(&arm))),
            kusto: Arc::new(KustoAdapter::new(Arc::clone(&arm))),
            servicebus: Arc::new(ServiceBusAdapter::new(Arc::clone(&arm))),
            keyvault: Arc::new(KeyVaultAdapter::new(Arc::clone(&arm))),
            marketplace: Arc::new(MarketplaceAdapter::new(Arc::clone(&arm))),
        };

        let mut context = Self::with_services(config, &services, process_env())?;
        context.arm = Some(arm);
        Ok(context)
    }

    /// Build the command tree over arbitrary service implementations
    ///
    /// `env` replaces the process environment for option fallbacks.
    ///
    /// # Errors
    /// `Internal` if two commands claim the same path.
    pub fn with_services(config: Config, services: &AreaServices, env: EnvLookup) -> Result<Self> {
        let mut builder = CommandRegistry::builder();
        register_all(&mut builder, services, config.retry).map_err(|err| {
            tracing::error!(error = %err, "failed to register commands");
            CloudCmdError::Internal(format!("failed to register commands: {err}"))
        })?;
        let registry = Arc::new(builder.build());

        info!(commands = registry.leaves().len(), "application context initialised");

        let executor = Arc::new(CommandExecutor::new(registry).with_env(env));
        Ok(Self { config, executor, arm: None })
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        self.executor.registry()
    }

    /// Shared management-plane context, absent when built over custom services
    pub fn arm(&self) -> Option<&Arc<ArmContext>> {
        self.arm.as_ref()
    }

    /// Run the command at `path` with already-parsed arguments
    pub async fn invoke(&self, path: &[&str], raw: &RawArgs) -> Execution {
        let execution = self.executor.execute(path, raw).await;
        log_command_execution(&execution.command, execution.response.status, execution.duration);
        execution
    }

    /// Run a command given as a single token list (`storage account list --subscription x`)
    pub async fn invoke_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Execution {
        let started = Instant::now();
        let (path, rest) = split_invocation(tokens);
        match RawArgs::from_tokens(rest) {
            Ok(raw) => self.invoke(&path, &raw).await,
            Err(errors) => {
                debug!(command = %path.join(" "), error = %errors, "malformed option tokens");
                rejected(path.join(" "), errors.to_string(), started.elapsed())
            }
        }
    }

    /// Every registered leaf, in registration order
    pub fn catalog(&self) -> Vec<CommandDescriptor> {
        self.registry()
            .leaves()
            .into_iter()
            .map(|(path, command)| CommandDescriptor {
                path,
                title: command.title().to_string(),
                description: command.description().to_string(),
                read_only: command.metadata().read_only,
                options: command
                    .options()
                    .into_iter()
                    .map(|option| OptionDescriptor {
                        name: option.name.to_string(),
                        description: option.description.to_string(),
                        kind: option.kind.to_string(),
                        required: option.required,
                        env_fallback: option.env_fallback.map(str::to_string),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// A 400 execution for input rejected before the command path was resolved
pub(crate) fn rejected(command: String, message: String, duration: Duration) -> Execution {
    let response = CommandResponse::failure(STATUS_BAD_REQUEST, message);
    log_command_execution(&command, response.status, duration);
    Execution { command, response, states: Vec::new(), duration }
}

/// Listing entry for one leaf command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDescriptor {
    pub path: String,
    pub title: String,
    pub description: String,
    pub read_only: bool,
    pub options: Vec<OptionDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDescriptor {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_fallback: Option<String>,
}
