//! Describe command implementation.

use std::io::Write;

use serde::Serialize;

use helix_client::{ApiClient, Resolution};

use crate::cli::DescribeArgs;
use crate::error::CliError;
use crate::output::{DescribeOutput, OutputFormat, TableDisplay};

/// Describe command executor.
pub struct DescribeCommand<'a> {
    client: &'a ApiClient,
}

/// A path that resolved to a folder rather than an object.
#[derive(Debug, Clone, Serialize)]
struct FolderOutput {
    project: String,
    folder: String,
}

impl TableDisplay for FolderOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Folder {}:{}", self.project, self.folder)?;
        Ok(())
    }
}

impl<'a> DescribeCommand<'a> {
    /// Create a new describe command.
    #[must_use]
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute the describe command.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &DescribeArgs,
    ) -> Result<(), CliError> {
        match self.client.resolve_existing(&args.path).await? {
            Resolution::Object(object) => {
                format.write(writer, &DescribeOutput(object.describe))?;
            }
            Resolution::Folder { project, folder } => {
                format.write(writer, &FolderOutput { project, folder })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_client::{ApiConfig, ClientError};

    #[tokio::test]
    async fn describe_without_apiserver_is_transport_error() {
        let client =
            ApiClient::new(ApiConfig::new("http://127.0.0.1:1", "tok")).expect("client");
        let command = DescribeCommand::new(&client);
        let mut out = Vec::new();
        let err = command
            .execute(
                &mut out,
                &OutputFormat::default(),
                &DescribeArgs {
                    path: "file-B5QF8pQ04QJzx0xKzZ8rTkYv".to_string(),
                },
            )
            .await
            .expect_err("no apiserver");
        assert!(matches!(err, CliError::Client(ClientError::Transport(_))));
    }

    #[tokio::test]
    async fn empty_path_fails_before_network() {
        let client =
            ApiClient::new(ApiConfig::new("http://127.0.0.1:1", "tok")).expect("client");
        let command = DescribeCommand::new(&client);
        let mut out = Vec::new();
        let err = command
            .execute(
                &mut out,
                &OutputFormat::default(),
                &DescribeArgs {
                    path: String::new(),
                },
            )
            .await
            .expect_err("empty path");
        assert!(matches!(err, CliError::Client(ClientError::InvalidPath(_))));
    }
}
