//! Validation and serialization contract for a single transaction line item.
//!
//! Raw, untrusted input arrives as a mapping of field name to JSON value. A
//! [`TransactionSchema`] checks and coerces every field, collecting all
//! violations into one [`ValidationError`], and produces an immutable
//! [`Transaction`]. [`Transaction::to_fields`] converts the value back into a
//! plain mapping that [`Transaction::construct`] accepts again unchanged.

pub mod engine;
pub mod models;
pub mod schema;
pub mod types;

pub use engine::{BatchReport, InputFormat, Rejection, ValidationEngine};
pub use models::{DecodeError, Transaction};
pub use schema::{FieldError, FieldErrorKind, TransactionSchema, ValidationError};
