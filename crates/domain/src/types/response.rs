//! Uniform command response

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{STATUS_OK, SUCCESS_MESSAGE};

/// Response returned for every invocation
///
/// `results` is omitted from the JSON form when absent; an empty collection
/// is never represented as an empty structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
}

impl CommandResponse {
    /// A 200 response with the fixed success message
    pub fn success(results: Option<Value>) -> Self {
        Self { status: STATUS_OK, message: SUCCESS_MESSAGE.to_string(), results }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), results: None }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}
