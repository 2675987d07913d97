//! CLI error types.

use thiserror::Error;

use helix_client::ClientError;
use helix_filter::FilterError;
use helix_pipeline::PipelineError;
use helix_proto::ProtoError;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command-line argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An input value could not be parsed for its class.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An `-i` input named a field the input spec does not have.
    #[error("input field \"{0}\" was not found in the input spec")]
    UnknownInputField(String),

    /// Required inputs are missing and prompting is unavailable.
    #[error("missing required inputs ({0}) and interactive mode is not available")]
    MissingInputs(String),

    /// The user cancelled interactive input selection.
    #[error("input selection cancelled")]
    Cancelled,

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A platform call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Filter payload assembly failed.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Pipeline preparation or import failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A payload type failed validation.
    #[error(transparent)]
    Proto(#[from] ProtoError),
}
