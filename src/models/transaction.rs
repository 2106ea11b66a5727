use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::errors::DecodeError;
use crate::schema::{FieldError, TransactionSchema, ValidationError};
use crate::types::{ItemId, Quantity, RawFields, ITEM_ID, ITEM_NAME, QUANTITY, ROOT_FIELD};

/// One validated line item of a transaction.
///
/// Values only come into existence through [`Transaction::construct`] (or the typed
/// [`Transaction::new`]) and are immutable afterwards. An unset `item_id` is kept
/// distinct from any integer id, including zero.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Transaction {
    item_id: Option<ItemId>,
    item_name: String,
    quantity: Quantity
}

impl Transaction {
    pub fn new(item_id: Option<ItemId>, item_name: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            item_id,
            item_name: item_name.into(),
            quantity
        }
    }

    /// Validates raw input against `schema` and builds a record from the coerced fields.
    ///
    /// Every field is checked independently.
    ///
    /// # Errors
    /// Returns a `ValidationError` listing each violation, in field declaration order:
    /// - `Missing` when `item_name` or `quantity` is absent.
    /// - `WrongType` when a value is null (for required fields) or structured.
    /// - `Uncoercible` when a value of an accepted kind cannot be converted.
    /// - `Unexpected` for undeclared keys, if the schema rejects them.
    pub fn construct(schema: &TransactionSchema, raw: &RawFields) -> Result<Self, ValidationError> {
        let item_id = schema.item_id().extract(raw);
        let item_name = schema.item_name().extract_required(raw);
        let quantity = schema.quantity().extract_required(raw);
        let unexpected = schema.unexpected_fields(raw);

        match (item_id, item_name, quantity) {
            (Ok(item_id), Ok(item_name), Ok(quantity)) if unexpected.is_empty() => {
                Ok(Self { item_id, item_name, quantity })
            }
            (item_id, item_name, quantity) => {
                let errors = [item_id.err(), item_name.err(), quantity.err()]
                    .into_iter()
                    .flatten()
                    .chain(unexpected)
                    .collect();

                Err(ValidationError::new(errors))
            }
        }
    }

    /// Decodes a JSON document and validates it. The document must be an object.
    pub fn from_json(schema: &TransactionSchema, json: &str) -> Result<Self, DecodeError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(raw) => Ok(Self::construct(schema, &raw)?),
            other => Err(ValidationError::from(FieldError::wrong_type(ROOT_FIELD, &other)).into())
        }
    }

    /// Converts the record into a plain mapping with keys `item_id`, `item_name` and `quantity`.
    ///
    /// An unset `item_id` is emitted as an explicit null, which `construct` reads back as unset.
    pub fn to_fields(&self) -> RawFields {
        let mut fields = RawFields::new();
        fields.insert(ITEM_ID.to_string(), self.item_id.map_or(Value::Null, Value::from));
        fields.insert(ITEM_NAME.to_string(), Value::from(self.item_name.as_str()));
        fields.insert(QUANTITY.to_string(), Value::from(self.quantity));
        fields
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.to_fields()).to_string()
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawFields::deserialize(deserializer)?;
        Transaction::construct(&TransactionSchema::default(), &raw).map_err(de::Error::custom)
    }
}
