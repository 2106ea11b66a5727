mod validation_engine;

use std::path::Path;

use crate::models::Transaction;
use crate::schema::ValidationError;
use crate::types::RawFields;

pub use validation_engine::ValidationEngine;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputFormat {
    /// One JSON object per line.
    JsonLines,
    /// A header row naming the fields, every cell read as a string.
    Csv
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::JsonLines
        }
    }
}

/// A record that failed validation, with the input line it started on.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub line: u64,
    pub error: ValidationError
}

/// Outcome of validating every record in one input.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Valid records, in input order.
    pub accepted: Vec<Transaction>,
    pub rejected: Vec<Rejection>,
    /// Lines that could not be decoded into a raw record at all.
    pub malformed: usize
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len() + self.malformed
    }
}

#[derive(Debug)]
enum Ingested {
    Record {
        line: u64,
        fields: RawFields
    },
    Malformed {
        line: u64,
        reason: String
    }
}
