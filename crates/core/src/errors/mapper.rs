//! Maps any command failure to a status code and message
//!
//! The mapping is a fixed, ordered rule table evaluated top to bottom; the
//! first matching rule wins and anything unmatched falls through to 500 with
//! the failure's own message. It is pure and total.

use cloudcmd_common::{ErrorClassification, ErrorSeverity};
use cloudcmd_domain::constants::{
    STATUS_BAD_REQUEST, STATUS_FORBIDDEN, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND,
    STATUS_SERVICE_UNAVAILABLE, STATUS_UNAUTHORIZED,
};
use cloudcmd_domain::{CloudCmdError, CommandResponse};

/// Result of classifying a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: u16,
    pub message: String,
    pub severity: ErrorSeverity,
    /// Name of the rule that matched, for logging
    pub rule: &'static str,
}

impl Outcome {
    pub fn into_response(self) -> CommandResponse {
        CommandResponse::failure(self.status, self.message)
    }
}

struct Rule {
    name: &'static str,
    matches: fn(&CloudCmdError) -> bool,
    status: fn(&CloudCmdError) -> u16,
}

static RULES: &[Rule] = &[
    Rule {
        name: "validation",
        matches: |e| matches!(e, CloudCmdError::Validation(_)),
        status: |_| STATUS_BAD_REQUEST,
    },
    Rule {
        name: "not_found",
        matches: |e| matches!(e, CloudCmdError::NotFound(_)),
        status: |_| STATUS_NOT_FOUND,
    },
    Rule {
        name: "unavailable",
        matches: |e| matches!(e, CloudCmdError::Unavailable(_)),
        status: |_| STATUS_SERVICE_UNAVAILABLE,
    },
    Rule {
        name: "auth_denied",
        matches: |e| matches!(e, CloudCmdError::Unauthenticated(_) | CloudCmdError::Forbidden(_)),
        status: |e| {
            if matches!(e, CloudCmdError::Unauthenticated(_)) {
                STATUS_UNAUTHORIZED
            } else {
                STATUS_FORBIDDEN
            }
        },
    },
];

/// Classify `error`
///
/// Messages are the failure's Display text: remote-supplied text for remote
/// failures, the enumerated problems for validation failures.
pub fn map_error(error: &CloudCmdError) -> Outcome {
    let (rule, status) = RULES
        .iter()
        .find(|rule| (rule.matches)(error))
        .map_or(("unclassified", STATUS_INTERNAL_ERROR), |rule| (rule.name, (rule.status)(error)));

    Outcome { status, message: error.to_string(), severity: error.severity(), rule }
}
