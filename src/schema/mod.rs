pub mod coercion;
mod descriptor;
mod errors;

pub use coercion::RawKind;
pub use descriptor::{FieldSpec, Presence, TransactionSchema, UnknownFields};
pub use errors::{FieldError, FieldErrorKind, ValidationError};
