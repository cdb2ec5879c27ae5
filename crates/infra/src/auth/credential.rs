//! Token credential chain
//!
//! Sources are tried in order:
//! 1. `AZURE_ACCESS_TOKEN`: a pre-acquired bearer token, used as-is
//! 2. `AZURE_CLIENT_ID` + `AZURE_CLIENT_SECRET`: client-credentials grant
//!    against `<authority>/<tenant>/oauth2/v2.0/token`
//!
//! Acquired tokens are cached per scope and refreshed
//! [`TOKEN_REFRESH_MARGIN_SECS`] before they expire.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use cloudcmd_domain::constants::{
    ENV_ACCESS_TOKEN, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_TENANT_ID, TOKEN_REFRESH_MARGIN_SECS,
};
use cloudcmd_domain::{CloudCmdError, Config, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::errors::conversions::infra;
use crate::http::HttpClient;

/// Where credentials come from, captured once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSettings {
    pub authority_host: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

impl CredentialSettings {
    pub fn from_env(config: &Config) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Blank variables count as unset
    pub fn from_lookup(config: &Config, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            authority_host: config.auth.authority_host.clone(),
            tenant_id: read(ENV_TENANT_ID),
            client_id: read(ENV_CLIENT_ID),
            client_secret: read(ENV_CLIENT_SECRET),
            access_token: read(ENV_ACCESS_TOKEN),
        }
    }
}

/// A bearer token and when it stops being valid
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    /// `None` for tokens supplied from outside, which never refresh
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let margin = Duration::seconds(i64::try_from(TOKEN_REFRESH_MARGIN_SECS).unwrap_or(i64::MAX));
        self.expires_at.map_or(true, |expires_at| expires_at - margin > now)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

enum TokenSource {
    Static(String),
    ClientSecret { token_url: Url, client_id: String, client_secret: String },
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

const fn default_expires_in() -> i64 {
    3600
}

#[derive(Deserialize)]
struct TokenError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Credential bound to one resolved tenant
pub struct ChainedCredential {
    tenant: Option<String>,
    source: TokenSource,
    http: HttpClient,
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl ChainedCredential {
    /// Pick the first configured source; `tenant` overrides `AZURE_TENANT_ID`
    ///
    /// # Errors
    /// `Unauthenticated` when no source is configured, `Config` when the
    /// client-secret flow has no tenant or the authority is not a URL.
    pub fn new(settings: &CredentialSettings, tenant: Option<&str>, http: HttpClient) -> Result<Self> {
        let tenant = tenant.map(str::to_string).or_else(|| settings.tenant_id.clone());

        let source = if let Some(token) = &settings.access_token {
            TokenSource::Static(token.clone())
        } else if let (Some(client_id), Some(client_secret)) =
            (&settings.client_id, &settings.client_secret)
        {
            let Some(tenant) = tenant.as_deref() else {
                return Err(CloudCmdError::Config(format!(
                    "{ENV_TENANT_ID} or --tenant is required for client secret authentication"
                )));
            };
            let authority = settings.authority_host.trim_end_matches('/');
            let token_url = Url::parse(&format!(
                "{authority}/{}/oauth2/v2.0/token",
                urlencoding::encode(tenant)
            ))
            .map_err(infra)?;
            TokenSource::ClientSecret {
                token_url,
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }
        } else {
            return Err(CloudCmdError::Unauthenticated(format!(
                "no credential source configured; set {ENV_ACCESS_TOKEN} or \
                 {ENV_CLIENT_ID} and {ENV_CLIENT_SECRET}"
            )));
        };

        info!(tenant = tenant.as_deref().unwrap_or("default"), source = source.name(), "credential created");
        Ok(Self { tenant, source, http, tokens: RwLock::new(HashMap::new()) })
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Bearer token for `scope`, fetched or refreshed when needed
    pub async fn token(&self, scope: &str) -> Result<String> {
        if let Some(token) = self.tokens.read().await.get(scope) {
            if token.is_fresh(Utc::now()) {
                return Ok(token.token.clone());
            }
        }

        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens.get(scope) {
            if token.is_fresh(Utc::now()) {
                return Ok(token.token.clone());
            }
        }

        let token = self.acquire(scope).await?;
        let value = token.token.clone();
        tokens.insert(scope.to_string(), token);
        Ok(value)
    }

    async fn acquire(&self, scope: &str) -> Result<AccessToken> {
        match &self.source {
            TokenSource::Static(token) => Ok(AccessToken { token: token.clone(), expires_at: None }),
            TokenSource::ClientSecret { token_url, client_id, client_secret } => {
                debug!(scope, "requesting token");
                let body = format!(
                    "grant_type=client_credentials&client_id={}&client_secret={}&scope={}",
                    urlencoding::encode(client_id),
                    urlencoding::encode(client_secret),
                    urlencoding::encode(scope),
                );
                let request = self
                    .http
                    .request(Method::POST, token_url.clone())
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(body);
                let response = self.http.send(request).await?;
                let status = response.status();
                let bytes = response.bytes().await.map_err(infra)?;

                if !status.is_success() {
                    let detail = serde_json::from_slice::<TokenError>(&bytes)
                        .ok()
                        .and_then(|e| e.error_description.or(e.error))
                        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
                    return Err(CloudCmdError::Unauthenticated(format!(
                        "token request failed: {detail}"
                    )));
                }

                let parsed: TokenResponse = serde_json::from_slice(&bytes).map_err(infra)?;
                Ok(AccessToken {
                    token: parsed.access_token,
                    expires_at: Some(Utc::now() + Duration::seconds(parsed.expires_in)),
                })
            }
        }
    }
}

impl TokenSource {
    const fn name(&self) -> &'static str {
        match self {
            Self::Static(_) => "access_token",
            Self::ClientSecret { .. } => "client_secret",
        }
    }
}

impl std::fmt::Debug for ChainedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedCredential")
            .field("tenant", &self.tenant)
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}
