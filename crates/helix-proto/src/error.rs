//! Error types for the helix-proto crate.

use thiserror::Error;

/// Errors that can occur while building or decoding platform payloads.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A value failed shape validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A payload could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A payload could not be decoded.
    #[error("decoding error: {0}")]
    Decoding(String),
}
