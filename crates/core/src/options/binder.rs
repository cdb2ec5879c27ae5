//! Binding raw arguments to typed options

use std::sync::Arc;

use cloudcmd_common::validation::{ValidationResult, Validator};

use super::{BoundOptions, OptionDefinition, OptionKind, OptionValue, RawArgs};

/// Environment variable lookup used for option fallbacks
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the process environment
pub fn process_env() -> EnvLookup {
    Arc::new(|name| std::env::var(name).ok())
}

/// Binds [`RawArgs`] against a command's option definitions
///
/// Lenient by default: unknown options are ignored. In strict mode they are
/// reported as validation errors.
pub struct OptionBinder<'a> {
    definitions: &'a [OptionDefinition],
    strict: bool,
}

impl<'a> OptionBinder<'a> {
    pub fn new(definitions: &'a [OptionDefinition]) -> Self {
        Self { definitions, strict: false }
    }

    /// Report unknown options instead of ignoring them
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Bind using the process environment for fallbacks
    pub fn bind(&self, raw: &RawArgs) -> ValidationResult<BoundOptions> {
        self.bind_with_env(raw, &process_env())
    }

    /// Convert every recognised option to its declared type
    ///
    /// An option absent from `raw` is filled from its environment fallback
    /// when one is declared and set; an explicit value always wins. All type
    /// errors are collected before returning.
    pub fn bind_with_env(&self, raw: &RawArgs, env: &EnvLookup) -> ValidationResult<BoundOptions> {
        let mut validator = Validator::new();
        let mut bound = BoundOptions::new();

        for definition in self.definitions {
            let supplied = match raw.get(definition.name) {
                Some(value) => Some(value.map(str::to_string)),
                None => definition
                    .env_fallback
                    .and_then(|variable| (**env)(variable))
                    .filter(|value| !value.trim().is_empty())
                    .map(Some),
            };
            let Some(supplied) = supplied else {
                continue;
            };

            match convert(definition, supplied.as_deref()) {
                Ok(value) => bound.insert(definition, value),
                Err(message) => validator.add_error(definition.name, message),
            }
        }

        for name in raw.names() {
            if self.definitions.iter().any(|d| d.name == name) {
                continue;
            }
            if self.strict {
                validator.add_error(name, format!("Unrecognized option '--{name}'."));
            } else {
                tracing::debug!(option = name, "ignoring unrecognized option");
            }
        }

        validator.finalize().map(|()| bound)
    }

    /// Check every required option is present and non-blank
    pub fn validate(&self, options: &BoundOptions) -> ValidationResult<()> {
        let mut validator = Validator::new();
        for definition in self.definitions.iter().filter(|d| d.required) {
            let present = match options.get(definition.name) {
                Some(OptionValue::String(value)) => !value.trim().is_empty(),
                Some(_) => true,
                None => false,
            };
            if !present {
                validator.add_error(definition.name, definition.required_message());
            }
        }
        validator.finalize()
    }
}

fn convert(definition: &OptionDefinition, value: Option<&str>) -> Result<OptionValue, String> {
    let label = definition.label();
    match (definition.kind, value) {
        (OptionKind::Boolean, None) => Ok(OptionValue::Boolean(true)),
        (_, None) => Err(format!("{label} requires a value.")),
        (OptionKind::String, Some(v)) => Ok(OptionValue::String(v.to_string())),
        (OptionKind::Boolean, Some(v)) => match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(OptionValue::Boolean(true)),
            "false" | "0" | "no" | "off" => Ok(OptionValue::Boolean(false)),
            _ => Err(format!("{label} expects a boolean value, got '{v}'.")),
        },
        (OptionKind::Integer, Some(v)) => v
            .trim()
            .parse::<i64>()
            .map(OptionValue::Integer)
            .map_err(|_| format!("{label} expects an integer value, got '{v}'.")),
        (OptionKind::Number, Some(v)) => v
            .trim()
            .parse::<f64>()
            .map(OptionValue::Number)
            .map_err(|_| format!("{label} expects a numeric value, got '{v}'.")),
    }
}
