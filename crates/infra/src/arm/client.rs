//! Management-plane client
//!
//! Thin JSON client over [`HttpClient`]: bearer authentication, paging over
//! `nextLink`, and translation of error statuses into the domain taxonomy.

use std::sync::Arc;

use cloudcmd_domain::{CloudCmdError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::ChainedCredential;
use crate::errors::conversions::infra;
use crate::http::HttpClient;

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(default, rename = "nextLink")]
    next_link: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client bound to one credential and one retry configuration
pub struct ArmClient {
    http: HttpClient,
    endpoint: Url,
    credential: Arc<ChainedCredential>,
    scope: String,
}

impl ArmClient {
    pub fn new(
        http: HttpClient,
        endpoint: &str,
        credential: Arc<ChainedCredential>,
        scope: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(infra)?;
        Ok(Self { http, endpoint, credential, scope: scope.into() })
    }

    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub const fn credential(&self) -> &Arc<ChainedCredential> {
        &self.credential
    }

    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Absolute URL for a management path with `api-version` and extra query
    pub fn url(&self, path: &str, api_version: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.endpoint.join(path).map_err(infra)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
            pairs.append_pair("api-version", api_version);
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, api_version: &str) -> Result<T> {
        let url = self.url(path, api_version, &[])?;
        self.get_optional_url(url.clone(), &self.scope)
            .await?
            .ok_or_else(|| CloudCmdError::Remote(format!("empty response from {}", url.path())))
    }

    /// Like [`get`](Self::get), but an empty body yields `None`
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Option<T>> {
        let url = self.url(path, api_version, &[])?;
        self.get_optional_url(url, &self.scope).await
    }

    /// GET an absolute URL with a token for `scope`
    pub async fn get_optional_url<T: DeserializeOwned>(&self, url: Url, scope: &str) -> Result<Option<T>> {
        match self.fetch(url, scope).await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(infra),
            None => Ok(None),
        }
    }

    /// Collect every `value` item across all pages
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.url(path, api_version, query)?;
        self.list_url(url, &self.scope).await
    }

    pub async fn list_url<T: DeserializeOwned>(&self, url: Url, scope: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url);

        while let Some(url) = next.take() {
            let Some(body) = self.fetch(url, scope).await? else {
                break;
            };
            let page: Page<T> = serde_json::from_value(body).map_err(infra)?;
            items.extend(page.value);
            next = page.next_link.map(|link| Url::parse(&link)).transpose().map_err(infra)?;
        }

        Ok(items)
    }

    async fn fetch(&self, url: Url, scope: &str) -> Result<Option<Value>> {
        let token = self.credential.token(scope).await?;
        let path = url.path().to_string();
        let request = self
            .http
            .request(Method::GET, url)
            .header(AUTHORIZATION, format!("Bearer {token}"));

        let response = self.http.send(request).await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(infra)?;
        debug!(%path, %status, bytes = bytes.len(), "management response");

        if !status.is_success() {
            return Err(status_error(status, &bytes));
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes).map(Some).map_err(infra)
    }
}

/// Map an error response onto the domain taxonomy, preferring the remote
/// `error.message` text
pub fn status_error(status: StatusCode, body: &[u8]) -> CloudCmdError {
    let remote = serde_json::from_slice::<ErrorEnvelope>(body).ok().map(|envelope| envelope.error);
    let message = match remote {
        Some(ErrorBody { message: Some(message), .. }) => message,
        Some(ErrorBody { code: Some(code), .. }) => code,
        _ => format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status")),
    };

    match status {
        StatusCode::NOT_FOUND => CloudCmdError::NotFound(message),
        StatusCode::SERVICE_UNAVAILABLE => CloudCmdError::Unavailable(message),
        StatusCode::UNAUTHORIZED => CloudCmdError::Unauthenticated(message),
        StatusCode::FORBIDDEN => CloudCmdError::Forbidden(message),
        _ => CloudCmdError::Remote(message),
    }
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("credential", &self.credential)
            .field("retry", self.http.retry_settings())
            .finish_non_exhaustive()
    }
}
