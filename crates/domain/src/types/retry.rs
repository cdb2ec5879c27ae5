//! Retry policy value object

use std::hash::{Hash, Hasher};
use std::time::Duration;

use cloudcmd_common::validation::{FieldValidator, RangeValidator, ValidationResult, Validator};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_RETRY_DELAY_SECS, DEFAULT_RETRY_MAX_DELAY_SECS, DEFAULT_RETRY_MAX_RETRIES,
    DEFAULT_RETRY_NETWORK_TIMEOUT_SECS,
};
use crate::impl_keyword_conversions;

/// Backoff shape between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryMode {
    Fixed,
    #[default]
    Exponential,
}

impl_keyword_conversions!(RetryMode {
    Fixed => "fixed",
    Exponential => "exponential",
});

/// How a management client retries transient failures
///
/// Equality is structural over all five fields. Floating point fields compare
/// by total order so the relation stays reflexive and `Eq`/`Hash` agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub delay_seconds: f64,
    pub max_delay_seconds: f64,
    pub max_retries: u32,
    pub mode: RetryMode,
    pub network_timeout_seconds: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay_seconds: DEFAULT_RETRY_DELAY_SECS,
            max_delay_seconds: DEFAULT_RETRY_MAX_DELAY_SECS,
            max_retries: DEFAULT_RETRY_MAX_RETRIES,
            mode: RetryMode::Exponential,
            network_timeout_seconds: DEFAULT_RETRY_NETWORK_TIMEOUT_SECS,
        }
    }
}

impl RetryPolicy {
    /// Compare two optional policies; two absent policies are equal
    pub fn are_equal(a: Option<&Self>, b: Option<&Self>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Check every field is finite, non-negative and that the cap is not
    /// below the base delay
    pub fn validate(&self) -> ValidationResult<()> {
        let non_negative = RangeValidator::default().min(0.0_f64);
        let mut v = Validator::new();

        for (field, value) in [
            ("retry-delay", self.delay_seconds),
            ("retry-max-delay", self.max_delay_seconds),
            ("retry-network-timeout", self.network_timeout_seconds),
        ] {
            let label = format!("Option '--{field}'");
            if !value.is_finite() {
                v.add_error(field, format!("{label} must be a finite number of seconds."));
            } else {
                v.validate_field(field, &label, &value, &non_negative);
            }
        }

        if non_negative.validate(&self.delay_seconds).is_ok()
            && self.max_delay_seconds.is_finite()
            && self.max_delay_seconds < self.delay_seconds
        {
            v.add_error(
                "retry-max-delay",
                "Option '--retry-max-delay' must not be less than '--retry-delay'.",
            );
        }

        v.finalize()
    }

    pub fn delay(&self) -> Duration {
        seconds(self.delay_seconds)
    }

    pub fn max_delay(&self) -> Duration {
        seconds(self.max_delay_seconds)
    }

    pub fn network_timeout(&self) -> Duration {
        seconds(self.network_timeout_seconds)
    }
}

// Invalid values clamp to zero; `validate` is what rejects them.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

impl PartialEq for RetryPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.delay_seconds.total_cmp(&other.delay_seconds).is_eq()
            && self.max_delay_seconds.total_cmp(&other.max_delay_seconds).is_eq()
            && self.max_retries == other.max_retries
            && self.mode == other.mode
            && self.network_timeout_seconds.total_cmp(&other.network_timeout_seconds).is_eq()
    }
}

impl Eq for RetryPolicy {}

impl Hash for RetryPolicy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.delay_seconds.to_bits().hash(state);
        self.max_delay_seconds.to_bits().hash(state);
        self.max_retries.hash(state);
        self.mode.hash(state);
        self.network_timeout_seconds.to_bits().hash(state);
    }
}
