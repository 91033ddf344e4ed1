//! Error types for protocol conversion.

use thiserror::Error;

use crate::media::DataUriError;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid media attachment: {0}")]
    InvalidMedia(#[from] DataUriError),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
