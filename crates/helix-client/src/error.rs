//! Error types for the helix-client crate.

use thiserror::Error;

use helix_proto::ProtoError;

/// Errors that can occur while talking to the platform.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The platform rejected the call.
    #[error("API error ({kind}): {message}")]
    Api {
        /// Platform error type, e.g. `ResourceNotFound`.
        kind: String,
        /// Platform error message.
        message: String,
    },

    /// A path string could not be parsed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A path resolved to nothing.
    #[error("could not resolve \"{0}\" to a name or ID")]
    NotFound(String),

    /// A path resolved to more than one object.
    #[error("\"{0}\" is ambiguous: multiple objects match")]
    Ambiguous(String),

    /// A watched job reached a terminal failure state.
    #[error("job {id} ended in state {state}")]
    JobFailed {
        /// The job ID.
        id: String,
        /// The terminal state it reached.
        state: String,
    },

    /// The platform answered with a shape the client does not understand.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A payload type failed validation.
    #[error(transparent)]
    Proto(#[from] ProtoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ClientError::Api {
            kind: "InvalidInput".into(),
            message: "input field x is missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (InvalidInput): input field x is missing"
        );

        let err = ClientError::NotFound("foo/bar".into());
        assert_eq!(err.to_string(), "could not resolve \"foo/bar\" to a name or ID");

        let err = ClientError::JobFailed {
            id: "job-A1b2C3d4E5f6G7h8J9k0L1m2".into(),
            state: "failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "job job-A1b2C3d4E5f6G7h8J9k0L1m2 ended in state failed"
        );
    }
}
