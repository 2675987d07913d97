//! Error types for the helix-pipeline crate.

use thiserror::Error;

use helix_client::ClientError;

/// Errors that can occur while preparing or importing a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The pipeline resources directory does not exist.
    #[error("resources directory not found: {0}")]
    MissingResources(String),

    /// The pipeline schema could not be parsed.
    #[error("invalid pipeline schema: {0}")]
    InvalidSchema(String),

    /// No destination project is selected for the build.
    #[error("cannot create an applet without a destination project; select a project context first")]
    NoDestinationProject,

    /// A GitHub credentials value was not a file ID or project-qualified ID.
    #[error("invalid github credentials reference: {0}")]
    InvalidCredentials(String),

    /// The importer job finished without producing an applet.
    #[error("importer job {0} returned no output applet")]
    MissingOutput(String),

    /// The descriptor could not be encoded.
    #[error("descriptor encoding error: {0}")]
    Encode(String),

    /// A platform call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Filesystem error while writing build files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = PipelineError::MissingResources("/no/such/dir".into());
        assert_eq!(err.to_string(), "resources directory not found: /no/such/dir");

        let err = PipelineError::NoDestinationProject;
        assert!(err.to_string().contains("destination project"));

        let err = PipelineError::MissingOutput("job-A1b2C3d4E5f6G7h8J9k0L1m2".into());
        assert!(err.to_string().contains("no output applet"));
    }
}
