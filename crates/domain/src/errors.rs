//! Error types used throughout the application

use std::time::Duration;

use cloudcmd_common::validation::ValidationError;
use cloudcmd_common::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for cloudcmd
///
/// Remote-shaped variants carry the message supplied by the remote API so it
/// can be surfaced to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CloudCmdError {
    /// Invalid or missing user input, detected before any remote call
    #[error("{0}")]
    Validation(String),

    #[error("Failed to get credential: {0}")]
    CredentialCreation(String),

    #[error("Failed to create management client: {0}")]
    ClientCreation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),

    /// The remote API rejected the caller's identity (401)
    #[error("{0}")]
    Unauthenticated(String),

    /// The remote API denied access to the resource (403)
    #[error("{0}")]
    Forbidden(String),

    /// Any other remote failure
    #[error("{0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CloudCmdError {
    /// Short machine-readable label for log fields
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::CredentialCreation(_) => "credential_creation",
            Self::ClientCreation(_) => "client_creation",
            Self::NotFound(_) => "not_found",
            Self::Unavailable(_) => "unavailable",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::Remote(_) => "remote",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ValidationError> for CloudCmdError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ErrorClassification for CloudCmdError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound(_) => ErrorSeverity::Info,
            Self::Validation(_)
            | Self::Unavailable(_)
            | Self::Unauthenticated(_)
            | Self::Forbidden(_) => ErrorSeverity::Warning,
            Self::CredentialCreation(_)
            | Self::ClientCreation(_)
            | Self::Remote(_)
            | Self::Config(_) => ErrorSeverity::Error,
            Self::Internal(_) => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Result type alias for cloudcmd operations
pub type Result<T> = std::result::Result<T, CloudCmdError>;
