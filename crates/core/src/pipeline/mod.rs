//! Execution pipeline
//!
//! `Resolved → Validating → (Invalid | Valid → Executing → (Succeeded |
//! Failed → Mapping)) → Responded`, run exactly once per invocation.

mod command;
mod executor;
mod state;

pub use command::{Command, CommandContext};
pub use executor::{resolution_response, CommandExecutor, Execution};
pub use state::ExecutionState;
