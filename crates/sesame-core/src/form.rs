//! Field-level error maps for form submissions.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, InvalidInputError};

/// Key used for errors that do not belong to a single field.
pub const GENERAL: &str = "general";

/// Errors keyed by form field.
///
/// Server validation failures (HTTP 400 with a `validaciones` payload) map
/// one entry per field. Every other failure produces a single
/// [`GENERAL`] entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map holding only a general message.
    pub fn general_message(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(GENERAL, message);
        errors
    }

    /// Map a failed operation to form errors.
    ///
    /// `fallback` is used as the general message when the failure carries no
    /// server message of its own (transport failures, bodies without
    /// `mensaje`).
    pub fn from_error(err: &Error, fallback: &str) -> Self {
        match err {
            Error::Api(api) => {
                if let Some(validations) = api.validations() {
                    let errors = Self::from_validations(validations);
                    if !errors.is_empty() {
                        return errors;
                    }
                }
                Self::general_message(api.message().unwrap_or(fallback))
            }
            Error::InvalidInput(InvalidInputError::Form(errors)) => errors.clone(),
            _ => Self::general_message(fallback),
        }
    }

    fn from_validations(validations: &serde_json::Map<String, Value>) -> Self {
        let mut errors = Self::new();
        for (field, value) in validations {
            let message = match value {
                Value::String(s) => Some(s.clone()),
                // Only the first message per field is shown.
                Value::Array(items) => items.first().map(|first| match first {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }),
                Value::Null => None,
                other => Some(other.to_string()),
            };
            if let Some(message) = message {
                errors.insert(field.clone(), message);
            }
        }
        errors
    }

    /// Record an error for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Returns the error for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns the general error, if any.
    pub fn general(&self) -> Option<&str> {
        self.get(GENERAL)
    }

    /// Overlay another map on this one; entries from `other` win.
    pub fn merge(&mut self, other: &FormErrors) {
        for (field, message) in &other.0 {
            self.0.insert(field.clone(), message.clone());
        }
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<FormErrors> for Error {
    fn from(errors: FormErrors) -> Self {
        Error::InvalidInput(InvalidInputError::Form(errors))
    }
}
