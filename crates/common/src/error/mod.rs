//! Error classification shared by every cloudcmd error type
//!
//! Module-specific errors stay in their own crates (`CloudCmdError` in the
//! domain crate, `RegistryError` in core). This module only provides the
//! vocabulary used to reason about them uniformly:
//!
//! - **`ErrorClassification` trait**: retryability, severity, criticality and
//!   suggested retry delay
//! - **`ErrorSeverity` enum**: a unified severity level used to pick the log
//!   level when a failure is reported
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Resource not found |
//! | **Warning** | Caller-correctable or transient | Invalid options, auth denial, unavailable service |
//! | **Error** | Failure requiring attention | Unclassified remote failure, credential construction |
//! | **Critical** | System integrity at risk | Internal invariant violations |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use cloudcmd_common::error::{ErrorClassification, ErrorSeverity};
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Throttled(Duration),
//!     Missing,
//! }
//!
//! impl ErrorClassification for FetchError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Throttled(_))
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Throttled(_) => ErrorSeverity::Warning,
//!             Self::Missing => ErrorSeverity::Info,
//!         }
//!     }
//!
//!     fn is_critical(&self) -> bool {
//!         false
//!     }
//!
//!     fn retry_after(&self) -> Option<Duration> {
//!         match self {
//!             Self::Throttled(delay) => Some(*delay),
//!             Self::Missing => None,
//!         }
//!     }
//! }
//!
//! assert!(FetchError::Throttled(Duration::from_secs(1)).is_retryable());
//! assert_eq!(FetchError::Missing.severity(), ErrorSeverity::Info);
//! ```

use std::fmt;
use std::time::Duration;

/// Error classification trait for consistent error handling across crates
///
/// This trait provides a standard interface for classifying errors by their
/// characteristics, enabling consistent logging and retry decisions.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are typically transient issues that may succeed if
    /// attempted again, such as:
    /// - Network timeouts
    /// - Temporary service unavailability
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging and alerting decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `Some(Duration)` when a specific retry delay is recommended,
    /// or `None` if no specific delay is suggested.
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the classification vocabulary

    use super::*;

    #[derive(Debug)]
    enum SampleError {
        Transient,
        Broken,
    }

    impl ErrorClassification for SampleError {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Transient)
        }

        fn severity(&self) -> ErrorSeverity {
            match self {
                Self::Transient => ErrorSeverity::Warning,
                Self::Broken => ErrorSeverity::Critical,
            }
        }

        fn is_critical(&self) -> bool {
            self.severity() == ErrorSeverity::Critical
        }

        fn retry_after(&self) -> Option<Duration> {
            match self {
                Self::Transient => Some(Duration::from_millis(250)),
                Self::Broken => None,
            }
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Info.to_string(), "INFO");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Error.to_string(), "ERROR");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_classification_through_trait_object() {
        let errors: Vec<Box<dyn ErrorClassification>> =
            vec![Box::new(SampleError::Transient), Box::new(SampleError::Broken)];

        assert!(errors[0].is_retryable());
        assert_eq!(errors[0].retry_after(), Some(Duration::from_millis(250)));
        assert!(!errors[1].is_retryable());
        assert!(errors[1].is_critical());
    }
}
