//! Conversions from external infrastructure errors into domain errors.

use cloudcmd_domain::CloudCmdError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CloudCmdError);

impl From<InfraError> for CloudCmdError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CloudCmdError> for InfraError {
    fn from(value: CloudCmdError) -> Self {
        Self(value)
    }
}

trait IntoCloudCmdError {
    fn into_cloudcmd(self) -> CloudCmdError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CloudCmdError */
/* -------------------------------------------------------------------------- */

impl IntoCloudCmdError for HttpError {
    fn into_cloudcmd(self) -> CloudCmdError {
        if self.is_timeout() {
            return CloudCmdError::Unavailable("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CloudCmdError::Unavailable(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 => CloudCmdError::Unauthenticated(message),
                403 => CloudCmdError::Forbidden(message),
                404 => CloudCmdError::NotFound(message),
                503 => CloudCmdError::Unavailable(message),
                _ => CloudCmdError::Remote(message),
            };
        }

        if self.is_builder() {
            return CloudCmdError::Config(format!("invalid HTTP request: {self}"));
        }

        CloudCmdError::Remote(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_cloudcmd())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CloudCmdError */
/* -------------------------------------------------------------------------- */

impl IntoCloudCmdError for JsonError {
    fn into_cloudcmd(self) -> CloudCmdError {
        CloudCmdError::Remote(format!("unexpected response payload: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        Self(value.into_cloudcmd())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → CloudCmdError */
/* -------------------------------------------------------------------------- */

impl IntoCloudCmdError for UrlError {
    fn into_cloudcmd(self) -> CloudCmdError {
        CloudCmdError::Config(format!("invalid URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        Self(value.into_cloudcmd())
    }
}

/// Shorthand for `map_err` sites: `.map_err(infra)?`
pub fn infra<E: Into<InfraError>>(err: E) -> CloudCmdError {
    err.into().into()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
