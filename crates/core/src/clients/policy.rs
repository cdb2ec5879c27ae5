//! Cross-cutting client policies

use std::sync::Arc;

use cloudcmd_domain::constants::{APP_NAME, APP_VERSION};
use cloudcmd_domain::RetryPolicy;

/// Identifying headers attached to every management request
///
/// Built once at startup and shared by every client the process creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPolicy {
    user_agent: String,
    headers: Vec<(String, String)>,
}

impl HeaderPolicy {
    /// `<name>/<version> (<os>; <arch>)`
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            user_agent: format!(
                "{name}/{version} ({}; {})",
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
            headers: Vec::new(),
        }
    }

    /// Policy identifying this build
    pub fn for_application() -> Self {
        Self::new(APP_NAME, APP_VERSION)
    }

    /// Add an extra header sent alongside the user agent
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Extra headers, excluding the user agent
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Everything a factory needs beyond the credential to build a client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub header_policy: Arc<HeaderPolicy>,
    /// `None` means the client library's own retry defaults
    pub retry: Option<RetryPolicy>,
}
