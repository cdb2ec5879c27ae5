//! Runs one invocation through the state machine

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cloudcmd_common::validation::{ValidationError, ValidationResult};
use cloudcmd_common::ErrorSeverity;
use cloudcmd_domain::constants::{STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND};
use cloudcmd_domain::{CloudCmdError, CommandResponse};
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::{Command, CommandContext, ExecutionState};
use crate::errors::mapper::{map_error, Outcome};
use crate::options::{process_env, BoundOptions, EnvLookup, OptionBinder, RawArgs};
use crate::registry::{CommandRegistry, RegistryError};

/// A finished execution
#[derive(Debug, Clone)]
pub struct Execution {
    pub command: String,
    pub response: CommandResponse,
    /// States visited, in order; empty when the path did not resolve
    pub states: Vec<ExecutionState>,
    pub duration: Duration,
}

struct Trace {
    states: Vec<ExecutionState>,
}

impl Trace {
    fn new() -> Self {
        Self { states: vec![ExecutionState::Resolved] }
    }

    fn advance(&mut self, next: ExecutionState) {
        debug_assert!(
            self.states.last().is_some_and(|current| current.can_advance_to(next)),
            "illegal transition to {next}"
        );
        self.states.push(next);
    }
}

/// Response for a path that did not resolve to a leaf
pub fn resolution_response(error: &RegistryError) -> CommandResponse {
    let status = match error {
        RegistryError::NotFound { .. } => STATUS_NOT_FOUND,
        RegistryError::AmbiguousPath { .. } => STATUS_BAD_REQUEST,
        _ => STATUS_INTERNAL_ERROR,
    };
    CommandResponse::failure(status, error.to_string())
}

/// Resolves, validates, executes and maps failures for each invocation
///
/// Shares one read-only registry across any number of concurrent calls.
pub struct CommandExecutor {
    registry: Arc<CommandRegistry>,
    env: EnvLookup,
}

impl CommandExecutor {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry, env: process_env() }
    }

    /// Replace the environment used for option fallbacks
    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Resolve `path` and run the command it names
    pub async fn execute(&self, path: &[&str], raw: &RawArgs) -> Execution {
        let started = Instant::now();
        let command_path = path.join(" ");

        match self.registry.resolve(path) {
            Ok(command) => self.run(command.as_ref(), &command_path, raw).await,
            Err(err) => {
                debug!(command = %command_path, error = %err, "command path did not resolve");
                Execution {
                    command: command_path,
                    response: resolution_response(&err),
                    states: Vec::new(),
                    duration: started.elapsed(),
                }
            }
        }
    }

    /// Run an already-resolved command
    ///
    /// Validation completes before the body runs; every failure of the body
    /// is caught here and mapped to a response.
    pub async fn run(&self, command: &dyn Command, path: &str, raw: &RawArgs) -> Execution {
        let started = Instant::now();
        let context = CommandContext::new(path);
        let mut trace = Trace::new();

        trace.advance(ExecutionState::Validating);
        let response = match self.bind_and_validate(command, raw) {
            Err(errors) => {
                trace.advance(ExecutionState::Invalid);
                warn!(
                    command = path,
                    invocation_id = %context.invocation_id,
                    error = %errors,
                    "command validation failed"
                );
                CommandResponse::failure(STATUS_BAD_REQUEST, errors.to_string())
            }
            Ok(options) => {
                trace.advance(ExecutionState::Valid);
                trace.advance(ExecutionState::Executing);

                let result = AssertUnwindSafe(command.execute(&context, &options))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Err(CloudCmdError::Internal(format!("command '{path}' panicked")))
                    });

                match result {
                    Ok(results) => {
                        trace.advance(ExecutionState::Succeeded);
                        CommandResponse::success(results)
                    }
                    Err(err) => {
                        trace.advance(ExecutionState::Failed);
                        trace.advance(ExecutionState::Mapping);
                        let outcome = map_error(&err);
                        log_failure(&context, &options, &err, &outcome);
                        outcome.into_response()
                    }
                }
            }
        };
        trace.advance(ExecutionState::Responded);

        Execution {
            command: path.to_string(),
            response,
            states: trace.states,
            duration: started.elapsed(),
        }
    }

    fn bind_and_validate(
        &self,
        command: &dyn Command,
        raw: &RawArgs,
    ) -> ValidationResult<BoundOptions> {
        let definitions = command.options();
        let binder = OptionBinder::new(&definitions);
        let options = binder.bind_with_env(raw, &self.env)?;

        let mut errors = ValidationError::new();
        if let Err(missing) = binder.validate(&options) {
            errors.merge(missing);
        }
        if let Err(invalid) = command.validate(&options) {
            errors.merge(invalid);
        }

        if errors.is_empty() {
            Ok(options)
        } else {
            Err(errors)
        }
    }
}

fn log_failure(
    context: &CommandContext,
    options: &BoundOptions,
    err: &CloudCmdError,
    outcome: &Outcome,
) {
    let parameters = options.redacted();
    macro_rules! emit {
        ($level:ident) => {
            $level!(
                command = %context.command,
                invocation_id = %context.invocation_id,
                status = outcome.status,
                rule = outcome.rule,
                error_kind = err.kind(),
                parameters = ?parameters,
                error = %err,
                "command failed"
            )
        };
    }

    match outcome.severity {
        ErrorSeverity::Info => emit!(info),
        ErrorSeverity::Warning => emit!(warn),
        ErrorSeverity::Error | ErrorSeverity::Critical => emit!(error),
    }
}
