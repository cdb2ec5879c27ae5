//! Domain types and models

pub mod command;
pub mod resources;
pub mod response;
pub mod retry;

pub use command::{is_guid, CommandMetadata};
pub use resources::*;
pub use response::CommandResponse;
pub use retry::{RetryMode, RetryPolicy};
