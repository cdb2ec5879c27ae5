//! Command descriptors

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Behavioural hints advertised by a leaf command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMetadata {
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: bool,
    /// Results may contain secret material
    pub secret: bool,
}

impl CommandMetadata {
    /// Read-only, idempotent query
    pub const fn read_only() -> Self {
        Self { read_only: true, destructive: false, idempotent: true, secret: false }
    }
}

/// True when `value` is a canonical GUID (tenant or subscription id)
pub fn is_guid(value: &str) -> bool {
    value.len() == 36 && Uuid::parse_str(value).is_ok()
}
