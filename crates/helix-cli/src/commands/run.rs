//! Run command implementation.
//!
//! Resolves the executable, assembles the job input hash, prompts for
//! anything missing, and POSTs the run call.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use helix_client::ApiClient;
use helix_proto::{is_app_ref, RunRequest};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::inputs::{ExecutableInputs, Prompter};
use crate::output::{JobLaunched, JobOutcome, OutputFormat};

/// Poll interval while watching a launched job.
const WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// What the run call is addressed to.
enum Executable {
    /// An app, by `app-<name>` reference.
    App(String),
    /// An applet, by ID.
    Applet(String),
}

/// Run command executor.
pub struct RunCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> RunCommand<'a> {
    /// Create a new run command.
    #[must_use]
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute the run command.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable cannot be resolved, inputs are
    /// missing or unparseable, or the run call fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &RunArgs,
        brief: bool,
    ) -> Result<(), CliError> {
        let (executable, describe) = self.resolve_executable(&args.executable).await?;

        let mut inputs = ExecutableInputs::new(self.client, &describe)?;
        inputs
            .update_from_args(
                args.input_json_file.as_deref(),
                args.input_json.as_deref(),
                &args.input,
            )
            .await?;

        if io::stdin().is_terminal() && io::stdout().is_terminal() {
            let mut prompter = Prompter::new(io::stdin().lock(), io::stderr());
            prompter.prompt_for_missing(&mut inputs).await?;
        } else {
            let missing = inputs.missing_required();
            if !missing.is_empty() {
                return Err(CliError::MissingInputs(missing.join(", ")));
            }
        }

        let project = self.client.config().project_context_or_err()?.to_string();
        let mut request = RunRequest::new(project, inputs.into_input_hash());
        if let Some(name) = &args.name {
            request = request.with_name(name);
        }
        request.folder = args.folder.clone();

        let response = match &executable {
            Executable::App(name) => self.client.run_app(name, &request).await?,
            Executable::Applet(id) => self.client.run_applet(id, &request).await?,
        };
        info!(job = %response.id, "launched job");

        if brief {
            writeln!(writer, "{}", response.id)?;
        } else {
            format.write(writer, &JobLaunched {
                id: response.id.clone(),
            })?;
        }

        if args.watch {
            let describe = self
                .client
                .wait_on_done(&response.id, WATCH_INTERVAL)
                .await?;
            format.write(writer, &JobOutcome {
                id: describe.id,
                state: describe.state.to_string(),
                output: describe.output,
            })?;
        }
        Ok(())
    }

    // Apps are addressed by reference; anything else must resolve to an
    // applet.
    async fn resolve_executable(&self, spec: &str) -> Result<(Executable, Value), CliError> {
        if is_app_ref(spec) {
            debug!(app = %spec, "describing app");
            let describe = self.client.describe(spec).await?;
            return Ok((Executable::App(spec.to_string()), describe));
        }
        let object = self.client.resolve_existing(spec).await?.into_object(spec)?;
        if object.class() != Some("applet") {
            return Err(CliError::InvalidArgument(format!(
                "{spec} is not an applet or app"
            )));
        }
        Ok((Executable::Applet(object.id.clone()), object.describe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use helix_client::{ApiConfig, ClientError};

    fn unreachable_client() -> ApiClient {
        ApiClient::new(ApiConfig::new("http://127.0.0.1:1", "tok")).expect("client")
    }

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::Run(args) => args,
            _ => panic!("expected run command"),
        }
    }

    #[tokio::test]
    async fn execute_without_apiserver_is_transport_error() {
        let client = unreachable_client();
        let args = run_args(&["helix", "run", "app-bwa_mem"]);
        let command = RunCommand::new(&client);
        let mut out = Vec::new();
        let err = command
            .execute(&mut out, &OutputFormat::default(), &args, false)
            .await
            .expect_err("no apiserver");
        assert!(matches!(err, CliError::Client(ClientError::Transport(_))));
    }

    #[tokio::test]
    async fn invalid_executable_path_fails_before_network() {
        let client = unreachable_client();
        // Two colons never reach the wire.
        let args = run_args(&["helix", "run", "a:b:c"]);
        let command = RunCommand::new(&client);
        let mut out = Vec::new();
        let err = command
            .execute(&mut out, &OutputFormat::default(), &args, false)
            .await
            .expect_err("bad path");
        assert!(matches!(err, CliError::Client(ClientError::InvalidPath(_))));
    }
}
