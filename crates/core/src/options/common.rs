//! Options shared by every resource-area command
//!
//! `--subscription` and `--tenant` identify where a command runs; the
//! `--retry-*` family overrides the management client's retry behaviour.

use cloudcmd_common::validation::{ValidationError, ValidationResult};
use cloudcmd_domain::constants::ENV_SUBSCRIPTION_ID;
use cloudcmd_domain::{Result, RetryMode, RetryPolicy};

use super::{BoundOptions, OptionDefinition};
use crate::areas::ports::ResourceScope;

pub const SUBSCRIPTION: OptionDefinition = OptionDefinition::string(
    "subscription",
    "Subscription ID or display name. Falls back to AZURE_SUBSCRIPTION_ID when omitted.",
)
.required()
.with_env_fallback(ENV_SUBSCRIPTION_ID);

pub const TENANT: OptionDefinition =
    OptionDefinition::string("tenant", "Tenant ID or domain name to authenticate against.");

pub const RETRY_DELAY: OptionDefinition =
    OptionDefinition::number("retry-delay", "Initial delay in seconds between retry attempts.");

pub const RETRY_MAX_DELAY: OptionDefinition =
    OptionDefinition::number("retry-max-delay", "Maximum delay in seconds between retries.");

pub const RETRY_MAX_RETRIES: OptionDefinition =
    OptionDefinition::integer("retry-max-retries", "Maximum number of retry attempts.");

pub const RETRY_MODE: OptionDefinition =
    OptionDefinition::string("retry-mode", "Retry backoff mode: fixed or exponential.");

pub const RETRY_NETWORK_TIMEOUT: OptionDefinition = OptionDefinition::number(
    "retry-network-timeout",
    "Network operation timeout in seconds.",
);

pub const RETRY_OPTIONS: [OptionDefinition; 5] =
    [RETRY_DELAY, RETRY_MAX_DELAY, RETRY_MAX_RETRIES, RETRY_MODE, RETRY_NETWORK_TIMEOUT];

/// `--subscription`, `--tenant` and the retry options, in that order
pub fn subscription_options() -> Vec<OptionDefinition> {
    let mut options = vec![SUBSCRIPTION, TENANT];
    options.extend(RETRY_OPTIONS);
    options
}

/// Assemble the retry policy from the bound retry options
///
/// `None` when no retry option was supplied. Fields left unset take the
/// client-library defaults.
///
/// # Errors
/// An unknown mode, a negative retry count or any value rejected by
/// [`RetryPolicy::validate`].
pub fn retry_policy(options: &BoundOptions) -> ValidationResult<Option<RetryPolicy>> {
    if !RETRY_OPTIONS.iter().any(|d| options.contains(d.name)) {
        return Ok(None);
    }

    let mut errors = ValidationError::new();
    let mut policy = RetryPolicy::default();

    if let Some(delay) = options.get_f64(RETRY_DELAY.name) {
        policy.delay_seconds = delay;
    }
    if let Some(max_delay) = options.get_f64(RETRY_MAX_DELAY.name) {
        policy.max_delay_seconds = max_delay;
    }
    if let Some(timeout) = options.get_f64(RETRY_NETWORK_TIMEOUT.name) {
        policy.network_timeout_seconds = timeout;
    }
    if let Some(retries) = options.get_i64(RETRY_MAX_RETRIES.name) {
        match u32::try_from(retries) {
            Ok(retries) => policy.max_retries = retries,
            Err(_) => errors.add_field_error(
                RETRY_MAX_RETRIES.name,
                format!("{} must be between 0 and {}", RETRY_MAX_RETRIES.label(), u32::MAX),
            ),
        }
    }
    if let Some(mode) = options.get_str(RETRY_MODE.name) {
        match mode.parse::<RetryMode>() {
            Ok(mode) => policy.mode = mode,
            Err(reason) => {
                errors.add_field_error(RETRY_MODE.name, format!("{}: {reason}", RETRY_MODE.label()));
            }
        }
    }

    if let Err(invalid) = policy.validate() {
        errors.merge(invalid);
    }

    if errors.is_empty() {
        Ok(Some(policy))
    } else {
        Err(errors)
    }
}

/// Check the retry options without building a scope
pub fn validate_retry(options: &BoundOptions) -> ValidationResult<()> {
    retry_policy(options).map(|_| ())
}

/// Subscription, tenant and retry policy for a resource-area call
///
/// `default_retry` is used when the invocation supplied no retry option.
///
/// # Errors
/// `Validation` when the subscription is missing or a retry option is invalid.
pub fn resource_scope(
    options: &BoundOptions,
    default_retry: Option<RetryPolicy>,
) -> Result<ResourceScope> {
    let subscription = options.require_str(SUBSCRIPTION.name)?.to_string();
    let tenant = options.get_str(TENANT.name).filter(|t| !t.trim().is_empty()).map(str::to_string);
    let retry_policy = retry_policy(options)?.or(default_retry);
    Ok(ResourceScope { subscription, tenant, retry_policy })
}
