use thiserror::Error;

use crate::schema::ValidationError;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Decode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError)
}
