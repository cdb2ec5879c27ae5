//! Raw, untyped invocation arguments

use cloudcmd_common::validation::{ValidationError, ValidationResult};
use serde_json::Value;

/// Named arguments as supplied by the caller, before typing
///
/// A `None` value is a bare flag (`--include-managed`). Later occurrences of
/// the same name replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs {
    entries: Vec<(String, Option<String>)>,
}

impl RawArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `--name value`, `--name=value` and bare `--flag` tokens
    ///
    /// # Errors
    /// A token that is neither an option nor the value of one.
    pub fn from_tokens<I, S>(tokens: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = Self::new();
        let mut errors = ValidationError::new();
        let mut tokens = tokens.into_iter().peekable();

        while let Some(token) = tokens.next() {
            let token = AsRef::<str>::as_ref(&token);
            let Some(body) = token.strip_prefix("--").filter(|b| !b.is_empty()) else {
                errors.add_field_error(token, format!("Unexpected argument '{token}'."));
                continue;
            };

            if let Some((name, value)) = body.split_once('=') {
                args.set(name, Some(value.to_string()));
                continue;
            }

            let takes_value =
                tokens.peek().is_some_and(|next| !AsRef::<str>::as_ref(next).starts_with("--"));
            let value = if takes_value {
                tokens.next().map(|v| AsRef::<str>::as_ref(&v).to_string())
            } else {
                None
            };
            args.set(body, value);
        }

        if errors.is_empty() {
            Ok(args)
        } else {
            Err(errors)
        }
    }

    /// Build from a JSON object of named arguments
    ///
    /// Keys may carry a leading `--`. Strings, booleans and numbers are
    /// accepted; `null` entries are skipped.
    ///
    /// # Errors
    /// A non-object payload, or a nested array/object value.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        let Value::Object(map) = value else {
            return Err(ValidationError::field("arguments", "Arguments must be a JSON object."));
        };

        let mut args = Self::new();
        let mut errors = ValidationError::new();
        for (key, value) in map {
            let name = key.trim_start_matches("--");
            match value {
                Value::Null => {}
                Value::String(s) => args.set(name, Some(s.clone())),
                Value::Bool(b) => args.set(name, Some(b.to_string())),
                Value::Number(n) => args.set(name, Some(n.to_string())),
                Value::Array(_) | Value::Object(_) => errors.add_field_error(
                    name,
                    format!("Option '--{name}' must be a string, boolean or number."),
                ),
            }
        }

        if errors.is_empty() {
            Ok(args)
        } else {
            Err(errors)
        }
    }

    pub fn set(&mut self, name: &str, value: Option<String>) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// Builder-style [`set`](Self::set) with a value
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, Some(value.into()));
        self
    }

    /// `Some(None)` for a bare flag, `None` when absent
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_deref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split a token list into the leading command path and the option tokens
///
/// The path ends at the first token starting with `-`.
pub fn split_invocation<S: AsRef<str>>(tokens: &[S]) -> (Vec<&str>, Vec<&str>) {
    let split = tokens
        .iter()
        .position(|t| AsRef::<str>::as_ref(t).starts_with('-'))
        .unwrap_or(tokens.len());
    let path = tokens[..split].iter().map(AsRef::<str>::as_ref).collect();
    let rest = tokens[split..].iter().map(AsRef::<str>::as_ref).collect();
    (path, rest)
}
