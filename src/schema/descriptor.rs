use serde_json::Value;

use crate::schema::coercion;
use crate::schema::errors::{FieldError, FieldErrorKind};
use crate::types::{ItemId, Quantity, RawFields, ITEM_ID, ITEM_NAME, QUANTITY};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Presence {
    /// An absent key or an explicit null yields no value.
    Optional,
    /// The key must be present and its value must coerce.
    Required
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UnknownFields {
    Ignore,
    Reject
}

/// Describes how one field is located in raw input and coerced to `T`.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<T> {
    name: &'static str,
    presence: Presence,
    coerce: fn(&Value) -> Result<T, FieldErrorKind>
}

impl<T> FieldSpec<T> {
    pub const fn optional(name: &'static str, coerce: fn(&Value) -> Result<T, FieldErrorKind>) -> Self {
        Self { name, presence: Presence::Optional, coerce }
    }

    pub const fn required(name: &'static str, coerce: fn(&Value) -> Result<T, FieldErrorKind>) -> Self {
        Self { name, presence: Presence::Required, coerce }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Looks the field up in `raw` and coerces it.
    ///
    /// Returns `Ok(None)` only for an optional field that is absent or null.
    pub fn extract(&self, raw: &RawFields) -> Result<Option<T>, FieldError> {
        match (raw.get(self.name), self.presence) {
            (None, Presence::Required) => Err(FieldError::missing(self.name)),
            (None, Presence::Optional) | (Some(Value::Null), Presence::Optional) => Ok(None),
            (Some(value), _) => (self.coerce)(value)
                .map(Some)
                .map_err(|kind| FieldError::new(self.name, kind, Some(value.clone())))
        }
    }

    /// Like [`FieldSpec::extract`], but a field that yields no value is reported as missing.
    pub fn extract_required(&self, raw: &RawFields) -> Result<T, FieldError> {
        self.extract(raw)?.ok_or_else(|| FieldError::missing(self.name))
    }
}

/// Immutable descriptor of the transaction record's fields and their coercion rules.
///
/// Build it once and pass it by reference to every validation call.
#[derive(Debug, Clone)]
pub struct TransactionSchema {
    item_id: FieldSpec<ItemId>,
    item_name: FieldSpec<String>,
    quantity: FieldSpec<Quantity>,
    unknown_fields: UnknownFields
}

impl TransactionSchema {
    pub fn new() -> Self {
        Self {
            item_id: FieldSpec::optional(ITEM_ID, coercion::to_integer),
            item_name: FieldSpec::required(ITEM_NAME, coercion::to_text),
            quantity: FieldSpec::required(QUANTITY, coercion::to_integer),
            unknown_fields: UnknownFields::Ignore
        }
    }

    /// Reports keys outside the declared fields as `Unexpected` instead of ignoring them.
    pub fn reject_unknown_fields(mut self) -> Self {
        self.unknown_fields = UnknownFields::Reject;
        self
    }

    pub fn item_id(&self) -> &FieldSpec<ItemId> {
        &self.item_id
    }

    pub fn item_name(&self) -> &FieldSpec<String> {
        &self.item_name
    }

    pub fn quantity(&self) -> &FieldSpec<Quantity> {
        &self.quantity
    }

    pub fn unknown_fields(&self) -> UnknownFields {
        self.unknown_fields
    }

    /// Declared field names, in declaration order.
    pub fn field_names(&self) -> [&'static str; 3] {
        [self.item_id.name(), self.item_name.name(), self.quantity.name()]
    }

    pub fn unexpected_fields(&self, raw: &RawFields) -> Vec<FieldError> {
        if self.unknown_fields == UnknownFields::Ignore {
            return Vec::new();
        }

        let declared = self.field_names();

        raw.iter()
            .filter(|(key, _)| !declared.iter().any(|name| *name == key.as_str()))
            .map(|(key, value)| FieldError::unexpected(key, value))
            .collect()
    }
}

impl Default for TransactionSchema {
    fn default() -> Self {
        Self::new()
    }
}
