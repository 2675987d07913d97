//! Build command implementation.
//!
//! Local builds prepare the applet descriptor next to the pipeline sources;
//! repository builds hand the work to the platform's pipeline importer app.

use std::io::Write;
use std::path::Path;

use helix_client::ApiClient;
use helix_pipeline::{import_from_repository, prepare, ImportOptions};

use crate::cli::BuildArgs;
use crate::error::CliError;
use crate::output::{BuildOutcome, OutputFormat};

/// Build command executor.
///
/// The client is only needed for repository imports; local preparation
/// works without credentials.
pub struct BuildCommand<'a> {
    client: Option<&'a ApiClient>,
}

impl<'a> BuildCommand<'a> {
    /// Create a new build command.
    #[must_use]
    pub fn new(client: Option<&'a ApiClient>) -> Self {
        Self { client }
    }

    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error for non-Nextflow builds, preparation failures, or
    /// importer failures.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &BuildArgs,
        brief: bool,
    ) -> Result<(), CliError> {
        if !args.nextflow {
            return Err(CliError::InvalidArgument(
                "only --nextflow builds are supported".to_string(),
            ));
        }

        if let Some(repository) = &args.repository {
            let client = self.client.ok_or_else(|| {
                CliError::InvalidArgument(
                    "repository imports require platform credentials".to_string(),
                )
            })?;
            let options = ImportOptions {
                repository: repository.clone(),
                tag: args.tag.clone(),
                profile: args.profile.clone(),
                github_credentials: args.github_credentials.clone(),
            };
            let outcome = import_from_repository(client, &options).await?;
            if brief {
                writeln!(writer, "{}", outcome.applet_id)?;
            } else {
                format.write(writer, &BuildOutcome {
                    applet_id: Some(outcome.applet_id),
                    job_id: Some(outcome.job_id),
                    build_dir: None,
                })?;
            }
        } else {
            let build_dir = prepare(Path::new(&args.src_dir), args.profile.as_deref())?;
            let build_dir = build_dir.display().to_string();
            if brief {
                writeln!(writer, "{build_dir}")?;
            } else {
                format.write(writer, &BuildOutcome {
                    applet_id: None,
                    job_id: None,
                    build_dir: Some(build_dir),
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn build_args(argv: &[&str]) -> BuildArgs {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::Build(args) => args,
            _ => panic!("expected build command"),
        }
    }

    #[tokio::test]
    async fn non_nextflow_builds_are_rejected() {
        let args = build_args(&["helix", "build"]);
        let command = BuildCommand::new(None);
        let mut out = Vec::new();
        let err = command
            .execute(&mut out, &OutputFormat::default(), &args, false)
            .await
            .expect_err("not nextflow");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn local_build_prepares_without_credentials() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dir_arg = dir.path().display().to_string();
        let args = build_args(&["helix", "build", "--nextflow", &dir_arg]);
        let command = BuildCommand::new(None);
        let mut out = Vec::new();
        command
            .execute(&mut out, &OutputFormat::default(), &args, false)
            .await
            .expect("local build");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("Prepared pipeline build directory"));
        assert!(dir.path().join(".helix.nextflow/applet.json").exists());
    }

    #[tokio::test]
    async fn brief_local_build_prints_bare_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dir_arg = dir.path().display().to_string();
        let args = build_args(&["helix", "build", "--nextflow", &dir_arg]);
        let command = BuildCommand::new(None);
        let mut out = Vec::new();
        command
            .execute(&mut out, &OutputFormat::default(), &args, true)
            .await
            .expect("local build");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.trim_end().ends_with(".helix.nextflow"));
    }
}
