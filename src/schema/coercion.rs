use std::fmt;
use std::fmt::{Display, Formatter};

use serde_json::{Number, Value};

use crate::schema::errors::FieldErrorKind;

/// The class of a raw input value, used as the row key of the coercion tables.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RawKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object
}

impl RawKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => RawKind::Null,
            Value::Bool(_) => RawKind::Bool,
            Value::Number(number) if number.is_f64() => RawKind::Float,
            Value::Number(_) => RawKind::Integer,
            Value::String(_) => RawKind::String,
            Value::Array(_) => RawKind::Array,
            Value::Object(_) => RawKind::Object
        }
    }
}

impl Display for RawKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            RawKind::Null => "null",
            RawKind::Bool => "bool",
            RawKind::Integer => "integer",
            RawKind::Float => "float",
            RawKind::String => "string",
            RawKind::Array => "array",
            RawKind::Object => "object"
        };

        formatter.write_str(name)
    }
}

/// Integer coercion table.
///
/// - integer: accepted when it fits an `i64`
/// - float: accepted when finite, whole, and within `i64`
/// - string: trimmed, then an optionally signed run of ASCII digits, optionally followed by `.`
///   and one or more zeros (`"3"`, `"-4.00"`); separators, exponents and bare points are not accepted
/// - null, bool, array, object: `WrongType`
///
/// Values of an accepted kind that fail the conversion are `Uncoercible`.
pub fn to_integer(value: &Value) -> Result<i64, FieldErrorKind> {
    match (RawKind::of(value), value) {
        (RawKind::Integer, Value::Number(number)) => number.as_i64().ok_or(FieldErrorKind::Uncoercible),
        (RawKind::Float, Value::Number(number)) => whole_float(number),
        (RawKind::String, Value::String(text)) => integer_from_str(text),
        _ => Err(FieldErrorKind::WrongType)
    }
}

/// Text coercion table.
///
/// Strings are taken verbatim, numbers and booleans use their JSON rendering.
/// Null and structured values are `WrongType`.
pub fn to_text(value: &Value) -> Result<String, FieldErrorKind> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(FieldErrorKind::WrongType)
    }
}

fn whole_float(number: &Number) -> Result<i64, FieldErrorKind> {
    let value = number.as_f64().ok_or(FieldErrorKind::Uncoercible)?;

    //NOTE: i64::MAX is not representable as an f64, the nearest value is 2^63 which is already out of range
    if !value.is_finite() || value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(FieldErrorKind::Uncoercible);
    }

    Ok(value as i64)
}

fn integer_from_str(text: &str) -> Result<i64, FieldErrorKind> {
    let text = text.trim();

    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None)
    };

    //NOTE: Only `[+-]digits` optionally followed by `.` and at least one zero, no separators or exponents
    let digits = integer.strip_prefix(['+', '-']).unwrap_or(integer);

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(FieldErrorKind::Uncoercible);
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|byte| byte == b'0') {
            return Err(FieldErrorKind::Uncoercible);
        }
    }

    integer.parse::<i64>().map_err(|_| FieldErrorKind::Uncoercible)
}
