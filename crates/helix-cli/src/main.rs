//! Helix CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use helix_cli::cli::{Cli, Commands, ExtractCommands};
use helix_cli::commands::{BuildCommand, DescribeCommand, RunCommand, SomaticCommand};
use helix_cli::error::CliError;
use helix_cli::output::OutputFormat;
use helix_client::{ApiClient, ApiConfig};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Run(args) => {
            let client = api_client(&cli)?;
            let cmd = RunCommand::new(&client);
            cmd.execute(&mut stdout, &format, args, cli.brief).await?;
        }
        Commands::Build(args) => {
            // Local preparation needs no credentials; only repository
            // imports talk to the platform.
            if args.repository.is_some() {
                let client = api_client(&cli)?;
                let cmd = BuildCommand::new(Some(&client));
                cmd.execute(&mut stdout, &format, args, cli.brief).await?;
            } else {
                let cmd = BuildCommand::new(None);
                cmd.execute(&mut stdout, &format, args, cli.brief).await?;
            }
        }
        Commands::Extract { command } => {
            let ExtractCommands::Somatic(args) = command;
            let client = api_client(&cli)?;
            let cmd = SomaticCommand::new(&client);
            cmd.execute(&mut stdout, &format, args).await?;
        }
        Commands::Describe(args) => {
            let client = api_client(&cli)?;
            let cmd = DescribeCommand::new(&client);
            cmd.execute(&mut stdout, &format, args).await?;
        }
    }

    Ok(())
}

fn api_client(cli: &Cli) -> Result<ApiClient, CliError> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = &cli.apiserver {
        config.apiserver_url = url.trim_end_matches('/').to_string();
    }
    Ok(ApiClient::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_cli::cli::Format;

    #[test]
    fn cli_parses_describe() {
        let cli = Cli::parse_from(["helix", "describe", "file-B5QF8pQ04QJzx0xKzZ8rTkYv"]);
        assert!(matches!(cli.command, Commands::Describe(_)));
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["helix", "--format", "json", "describe", "x"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn cli_respects_brief_flag() {
        let cli = Cli::parse_from(["helix", "--brief", "run", "app-bwa_mem"]);
        assert!(cli.brief);
    }

    #[tokio::test]
    async fn run_without_token_is_a_config_error() {
        // The token comes from the environment, which tests leave unset.
        if std::env::var("HELIX_API_TOKEN").is_ok() {
            return;
        }
        let cli = Cli::parse_from(["helix", "describe", "file-B5QF8pQ04QJzx0xKzZ8rTkYv"]);
        let result = run(cli).await;
        assert!(result.is_err());
    }
}
