//! # Record Validation
//!
//! This module provides the field validation toolkit used by the resource
//! schemas. Validators read from a JSON object, accumulate every violated
//! constraint instead of stopping at the first, and never touch the store:
//! a record that fails validation is rejected before any store interaction.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// The name of the field that failed.
    pub field: String,
    /// What was wrong with it.
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation for the named field.
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        FieldViolation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A validation failure enumerating every violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// All violations found in the input, in field order.
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Wraps accumulated violations; callers should check `is_empty` first.
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        ValidationError { violations }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed:")?;
        for v in &self.violations {
            write!(f, " [{}: {}]", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Requires the input to be a JSON object, the shape every record starts from.
pub fn expect_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| {
        ValidationError::new(vec![FieldViolation::new("body", "expected a JSON object")])
    })
}

/// Extracts a required non-empty string field.
pub fn required_string(
    map: &Map<String, Value>,
    field: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => {
            out.push(FieldViolation::new(field, "field required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            out.push(FieldViolation::new(field, "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            out.push(FieldViolation::new(field, "expected a string"));
            None
        }
    }
}

/// Extracts an optional string field; absent and null are both `None`.
pub fn optional_string(
    map: &Map<String, Value>,
    field: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            out.push(FieldViolation::new(field, "expected a string"));
            None
        }
    }
}

/// Extracts an optional boolean field, defaulting when absent.
pub fn bool_or(
    map: &Map<String, Value>,
    field: &str,
    default: bool,
    out: &mut Vec<FieldViolation>,
) -> bool {
    match map.get(field) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            out.push(FieldViolation::new(field, "expected a boolean"));
            default
        }
    }
}

/// Extracts an optional list-of-strings field, defaulting to empty.
pub fn string_list(
    map: &Map<String, Value>,
    field: &str,
    out: &mut Vec<FieldViolation>,
) -> Vec<String> {
    match map.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let mut strings = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => strings.push(s.clone()),
                    _ => out.push(FieldViolation::new(
                        field,
                        format!("element {} must be a string", index),
                    )),
                }
            }
            strings
        }
        Some(_) => {
            out.push(FieldViolation::new(field, "expected a list of strings"));
            Vec::new()
        }
    }
}

/// Extracts an optional number constrained to an inclusive range, as used for
/// age-like fields bounded to [0, 120].
pub fn number_in_range(
    map: &Map<String, Value>,
    field: &str,
    min: f64,
    max: f64,
    out: &mut Vec<FieldViolation>,
) -> Option<f64> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => {
            let value = n.as_f64()?;
            if value < min || value > max {
                out.push(FieldViolation::new(
                    field,
                    format!("must be between {} and {}", min, max),
                ));
                None
            } else {
                Some(value)
            }
        }
        Some(_) => {
            out.push(FieldViolation::new(field, "expected a number"));
            None
        }
    }
}

/// Extracts a required non-negative number, as used for price-like fields.
pub fn non_negative_number(
    map: &Map<String, Value>,
    field: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<f64> {
    match map.get(field) {
        None | Some(Value::Null) => {
            out.push(FieldViolation::new(field, "field required"));
            None
        }
        Some(Value::Number(n)) => {
            let value = n.as_f64()?;
            if value < 0.0 {
                out.push(FieldViolation::new(field, "must not be negative"));
                None
            } else {
                Some(value)
            }
        }
        Some(_) => {
            out.push(FieldViolation::new(field, "expected a number"));
            None
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Extracts a required field that must be a well-formed email address.
pub fn required_email(
    map: &Map<String, Value>,
    field: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<String> {
    let value = required_string(map, field, out)?;
    if email_regex().is_match(&value) {
        Some(value)
    } else {
        out.push(FieldViolation::new(field, "not a valid email address"));
        None
    }
}
