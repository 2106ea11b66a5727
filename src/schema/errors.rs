use std::fmt;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    WrongType,
    Uncoercible,
    Unexpected
}

impl Display for FieldErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            FieldErrorKind::Missing => "Field is required",
            FieldErrorKind::WrongType => "Input has an unsupported type",
            FieldErrorKind::Uncoercible => "Input could not be converted to the declared type",
            FieldErrorKind::Unexpected => "Field is not declared by the schema"
        };

        formatter.write_str(message)
    }
}

/// A single violation found while validating one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,
    pub kind: FieldErrorKind,
    /// The raw input that was rejected, absent when the field itself was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>
}

impl FieldError {
    pub fn new(field: &str, kind: FieldErrorKind, value: Option<Value>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            value
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, FieldErrorKind::Missing, None)
    }

    pub fn wrong_type(field: &str, value: &Value) -> Self {
        Self::new(field, FieldErrorKind::WrongType, Some(value.clone()))
    }

    pub fn uncoercible(field: &str, value: &Value) -> Self {
        Self::new(field, FieldErrorKind::Uncoercible, Some(value.clone()))
    }

    pub fn unexpected(field: &str, value: &Value) -> Self {
        Self::new(field, FieldErrorKind::Unexpected, Some(value.clone()))
    }
}

impl Display for FieldError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(formatter, "[{}] {} (input: {})", self.field, self.kind, value),
            None => write!(formatter, "[{}] {}", self.field, self.kind)
        }
    }
}

/// Every violation found in one validation pass.
///
/// Errors are ordered by field declaration order, followed by any undeclared
/// fields. A `ValidationError` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{} validation error(s) for Transaction: {}", .errors.len(), join_errors(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>
}

impl ValidationError {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty(), "a validation error must carry at least one field error");
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Returns `true` when a violation of `kind` was recorded for `field`.
    pub fn contains(&self, field: &str, kind: FieldErrorKind) -> bool {
        self.errors.iter().any(|error| error.field == field && error.kind == kind)
    }
}

impl From<FieldError> for ValidationError {
    fn from(error: FieldError) -> Self {
        Self::new(vec![error])
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
