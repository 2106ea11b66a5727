use serde_json::{Map, Value};

pub type ItemId = i64;
pub type Quantity = i64;

/// Untyped input keyed by field name, as decoded by whatever transport produced it.
pub type RawFields = Map<String, Value>;

pub const ITEM_ID: &str = "item_id";
pub const ITEM_NAME: &str = "item_name";
pub const QUANTITY: &str = "quantity";

/// Field name used for errors that concern the whole record rather than one field.
pub const ROOT_FIELD: &str = "__root__";
