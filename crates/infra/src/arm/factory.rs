//! Builds credentials and management clients for the resource client cache

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cloudcmd_core::{ClientOptions, ResourceClientFactory};
use cloudcmd_domain::{Config, Result};

use super::ArmClient;
use crate::auth::{ChainedCredential, CredentialSettings};
use crate::http::{HttpClient, RetrySettings};

#[derive(Clone)]
pub struct ArmClientFactory {
    settings: CredentialSettings,
    endpoint: String,
    scope: String,
    request_timeout: Duration,
    /// Shared by every credential for token requests
    token_http: HttpClient,
}

impl ArmClientFactory {
    pub fn new(config: &Config, settings: CredentialSettings) -> Result<Self> {
        Ok(Self {
            settings,
            endpoint: config.management.endpoint.clone(),
            scope: config.token_scope(),
            request_timeout: Duration::from_secs(config.management.request_timeout_seconds),
            token_http: HttpClient::new()?,
        })
    }

    /// Factory whose credentials read the process environment
    pub fn from_env(config: &Config) -> Result<Self> {
        Self::new(config, CredentialSettings::from_env(config))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retry settings for a client; without a policy the configured request
    /// timeout still applies
    pub fn retry_settings(&self, options: &ClientOptions) -> RetrySettings {
        let mut settings = RetrySettings::from_policy(options.retry.as_ref());
        if options.retry.is_none() {
            settings.network_timeout = self.request_timeout;
        }
        settings
    }
}

#[async_trait]
impl ResourceClientFactory for ArmClientFactory {
    type Credential = ChainedCredential;
    type Client = ArmClient;

    async fn create_credential(&self, tenant: Option<&str>) -> Result<ChainedCredential> {
        ChainedCredential::new(&self.settings, tenant, self.token_http.clone())
    }

    async fn create_client(
        &self,
        credential: Arc<ChainedCredential>,
        options: &ClientOptions,
    ) -> Result<ArmClient> {
        let http = HttpClient::builder()
            .retry(self.retry_settings(options))
            .header_policy(&options.header_policy)?
            .build()?;
        ArmClient::new(http, &self.endpoint, credential, self.scope.clone())
    }
}
