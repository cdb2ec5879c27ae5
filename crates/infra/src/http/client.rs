use std::time::Duration;

use cloudcmd_core::HeaderPolicy;
use cloudcmd_domain::{CloudCmdError, Result, RetryMode, RetryPolicy};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::debug;

use crate::errors::conversions::infra;

/// Retry behaviour of an [`HttpClient`], derived from a [`RetryPolicy`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub delay: Duration,
    pub max_delay: Duration,
    pub mode: RetryMode,
    /// Per-attempt timeout
    pub network_timeout: Duration,
}

impl RetrySettings {
    /// Field-by-field translation; an absent policy yields the library
    /// defaults.
    pub fn from_policy(policy: Option<&RetryPolicy>) -> Self {
        let defaults = RetryPolicy::default();
        let policy = policy.unwrap_or(&defaults);
        Self {
            max_retries: policy.max_retries,
            delay: policy.delay(),
            max_delay: policy.max_delay(),
            mode: policy.mode,
            network_timeout: policy.network_timeout(),
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let delay = match self.mode {
            RetryMode::Fixed => self.delay,
            RetryMode::Exponential => {
                let shift = retry.saturating_sub(1).min(16);
                self.delay.saturating_mul(1u32 << shift)
            }
        };
        delay.min(self.max_delay)
    }

    const fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self::from_policy(None)
    }
}

/// HTTP client with built-in retry and timeout support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetrySettings,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub const fn retry_settings(&self) -> &RetrySettings {
        &self.retry
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// Transport faults and 408/429/5xx responses are retried until the
    /// attempts run out; the last response is returned as-is.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let attempts = self.retry.attempts();

        for attempt in 1..=attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                CloudCmdError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder.build().map_err(infra)?;
            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if is_retryable_status(status) && attempt < attempts {
                        let delay = retry_after(&response)
                            .map_or_else(|| self.retry.backoff(attempt), |d| d.min(self.retry.max_delay));
                        sleep(delay).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    if attempt < attempts && should_retry_error(&err) {
                        sleep(self.retry.backoff(attempt)).await;
                        continue;
                    }

                    return Err(infra(err));
                }
            }
        }

        Err(CloudCmdError::Internal("http client exhausted retries without producing a result".into()))
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    retry: RetrySettings,
    user_agent: Option<String>,
    default_headers: HeaderMap,
}

impl HttpClientBuilder {
    pub const fn retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Apply the identifying user agent and extra headers of `policy`
    pub fn header_policy(mut self, policy: &HeaderPolicy) -> Result<Self> {
        self.user_agent = Some(policy.user_agent().to_string());
        for (name, value) in policy.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| CloudCmdError::Config(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| CloudCmdError::Config(format!("invalid header value: {e}")))?;
            self.default_headers.insert(name, value);
        }
        Ok(self)
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.retry.network_timeout)
            .default_headers(self.default_headers)
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(infra)?;
        Ok(HttpClient { client, retry: self.retry })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

fn retry_after(response: &Response) -> Option<Duration> {
    let seconds = response.headers().get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(seconds))
}

async fn sleep(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn quick(max_retries: u32) -> RetrySettings {
        RetrySettings {
            max_retries,
            delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            mode: RetryMode::Exponential,
            network_timeout: Duration::from_secs(5),
        }
    }

    fn client(max_retries: u32) -> HttpClient {
        HttpClient::builder().retry(quick(max_retries)).build().expect("http client")
    }

    #[test]
    fn settings_follow_the_policy_field_by_field() {
        let policy = RetryPolicy {
            delay_seconds: 2.0,
            max_delay_seconds: 10.0,
            max_retries: 7,
            mode: RetryMode::Fixed,
            network_timeout_seconds: 30.0,
        };
        let settings = RetrySettings::from_policy(Some(&policy));

        assert_eq!(settings.max_retries, 7);
        assert_eq!(settings.delay, Duration::from_secs(2));
        assert_eq!(settings.max_delay, Duration::from_secs(10));
        assert_eq!(settings.mode, RetryMode::Fixed);
        assert_eq!(settings.network_timeout, Duration::from_secs(30));
        assert_eq!(RetrySettings::from_policy(None), RetrySettings::default());
    }

    #[test]
    fn backoff_is_capped_at_max_delay() {
        let exponential = quick(5);
        assert_eq!(exponential.backoff(1), Duration::from_millis(5));
        assert_eq!(exponential.backoff(2), Duration::from_millis(10));
        assert_eq!(exponential.backoff(3), Duration::from_millis(20));
        assert_eq!(exponential.backoff(9), Duration::from_millis(20));

        let fixed = RetrySettings { mode: RetryMode::Fixed, ..quick(5) };
        assert_eq!(fixed.backoff(4), Duration::from_millis(5));
    }

    #[tokio::test]
    async fn returns_successful_response_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(3);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn retries_throttling_and_server_errors_until_success() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                match attempts_clone.fetch_add(1, Ordering::SeqCst) {
                    0 => ResponseTemplate::new(429),
                    1 => ResponseTemplate::new(500),
                    _ => ResponseTemplate::new(200),
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = client(3);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = client(2);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(0);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(3);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sends_identifying_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "cloudcmd/9.9.9 (testos; testarch)"))
            .and(header("x-ms-client-name", "cloudcmd"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let policy = HeaderPolicy::new("cloudcmd", "9.9.9").with_header("x-ms-client-name", "cloudcmd");
        let client = HttpClient::builder()
            .retry(quick(0))
            .header_policy(&policy)
            .expect("headers")
            .user_agent("cloudcmd/9.9.9 (testos; testarch)")
            .build()
            .expect("http client");

        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn network_failure_maps_to_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = format!("http://{addr}");

        let client = client(1);
        let result = client.send(client.request(Method::GET, &url)).await;
        match result {
            Err(CloudCmdError::Unavailable(msg)) => {
                assert!(msg.to_lowercase().contains("http"));
            }
            other => panic!("expected unavailable error, got {other:?}"),
        }
    }
}
