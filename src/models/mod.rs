mod errors;
#[cfg(test)]
mod tests;
mod transaction;

pub use errors::DecodeError;
pub use transaction::Transaction;
