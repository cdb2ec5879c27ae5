//! Option definitions, raw argument parsing and binding
//!
//! A leaf command declares the options it accepts as [`OptionDefinition`]s.
//! Raw user input ([`RawArgs`]) is bound against those definitions by
//! [`OptionBinder`], producing a fresh [`BoundOptions`] per invocation.

use std::collections::BTreeMap;
use std::fmt;

use cloudcmd_domain::{CloudCmdError, Result};

mod binder;
pub mod common;
mod raw;

pub use binder::{process_env, EnvLookup, OptionBinder};
pub use raw::{split_invocation, RawArgs};

/// Placeholder logged in place of sensitive option values
pub const REDACTED: &str = "***";

/// Primitive type of an option value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Boolean,
    Integer,
    /// Floating point, used by the retry options
    Number,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
        })
    }
}

/// Declaration of one `--name` option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
    pub required: bool,
    /// Environment variable consulted when the option is omitted
    pub env_fallback: Option<&'static str>,
    /// Value is replaced by [`REDACTED`] in logs
    pub sensitive: bool,
}

impl OptionDefinition {
    pub const fn new(name: &'static str, description: &'static str, kind: OptionKind) -> Self {
        Self { name, description, kind, required: false, env_fallback: None, sensitive: false }
    }

    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, OptionKind::String)
    }

    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, OptionKind::Boolean)
    }

    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, OptionKind::Integer)
    }

    pub const fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, OptionKind::Number)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn with_env_fallback(mut self, variable: &'static str) -> Self {
        self.env_fallback = Some(variable);
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// `Option '--name'`, the prefix of every message about this option
    pub fn label(&self) -> String {
        format!("Option '--{}'", self.name)
    }

    /// Message used when a required option is missing
    pub fn required_message(&self) -> String {
        format!("{} is required.", self.label())
    }
}

/// A typed option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Number(f64),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
        }
    }
}

/// Options bound for a single invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundOptions {
    values: BTreeMap<String, OptionValue>,
    sensitive: Vec<String>,
}

impl BoundOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, definition: &OptionDefinition, value: OptionValue) {
        if definition.sensitive {
            self.sensitive.push(definition.name.to_string());
        }
        self.values.insert(definition.name.to_string(), value);
    }

    /// Add a value directly; intended for tests and programmatic callers
    pub fn with(mut self, name: &str, value: OptionValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(OptionValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(OptionValue::Boolean(v)) => Some(*v),
            _ => None,
        }
    }

    /// Boolean option, `false` when absent
    pub fn flag(&self, name: &str) -> bool {
        self.get_bool(name).unwrap_or(false)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(OptionValue::Integer(v)) => Some(*v),
            _ => None,
        }
    }

    /// Numeric option; integers widen to `f64`
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(OptionValue::Number(v)) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Some(OptionValue::Integer(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// A string option the command requires
    ///
    /// # Errors
    /// `CloudCmdError::Validation` when the option is absent or blank.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.get_str(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CloudCmdError::Validation(format!("Option '--{name}' is required.")))
    }

    /// Bound values rendered for logging with sensitive values masked
    pub fn redacted(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| {
                let shown = if self.sensitive.iter().any(|s| s == name) {
                    REDACTED.to_string()
                } else {
                    value.to_string()
                };
                (name.clone(), shown)
            })
            .collect()
    }
}
