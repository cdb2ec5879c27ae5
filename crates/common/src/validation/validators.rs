// Field Validators - Reusable validation components
use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase kebab-case identifier: `storage`, `account`, `retry-max-delay`
static IDENTIFIER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").ok());

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value, returning the reason on failure
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Range validator for numeric types
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T> Default for RangeValidator<T> {
    fn default() -> Self {
        Self { min: None, max: None }
    }
}

impl<T> RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    /// Create a new range validator with min and max values
    pub fn new(min: T, max: T) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// Set minimum value
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        if let Some(ref min) = self.min {
            // NaN compares false both ways and falls through to here.
            if !(value >= min) {
                return Err(format!("must be at least {min}"));
            }
        }

        if let Some(ref max) = self.max {
            if value > max {
                return Err(format!("must not exceed {max}"));
            }
        }

        Ok(())
    }
}

/// String validator for names that must match a fixed shape
#[derive(Debug, Clone)]
pub struct StringValidator {
    max_length: usize,
    pattern: Option<Regex>,
}

impl StringValidator {
    /// Non-empty lowercase kebab-case identifier, untrimmed
    pub fn identifier() -> Self {
        Self { max_length: 64, pattern: IDENTIFIER.clone() }
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Err("cannot be empty".to_string());
        }

        if value.len() > self.max_length {
            return Err(format!("must not exceed {} characters", self.max_length));
        }

        match &self.pattern {
            Some(pattern) if pattern.is_match(value) => Ok(()),
            Some(pattern) => Err(format!("must match pattern: {}", pattern.as_str())),
            None => Err("has no usable pattern".to_string()),
        }
    }
}

impl FieldValidator<String> for StringValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}
