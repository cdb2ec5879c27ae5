//! Configuration structures
//!
//! Every section has defaults so an absent or partial file still yields a
//! usable `Config`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTHORITY_HOST, DEFAULT_MANAGEMENT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::impl_keyword_conversions;
use crate::types::RetryPolicy;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub management: ManagementConfig,
    pub auth: AuthConfig,
    /// Process-wide retry policy used when an invocation supplies none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,
    pub logging: LoggingConfig,
}

/// Management-plane endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementConfig {
    pub endpoint: String,
    pub request_timeout_seconds: u64,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Token authority settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub authority_host: String,
    /// Token scope; derived from the management endpoint when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { authority_host: DEFAULT_AUTHORITY_HOST.to_string(), scope: None }
    }
}

impl Config {
    /// Token scope for the configured management endpoint
    pub fn token_scope(&self) -> String {
        self.auth.scope.clone().unwrap_or_else(|| {
            format!("{}/.default", self.management.endpoint.trim_end_matches('/'))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_keyword_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `cloudcmd_core=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Text }
    }
}
