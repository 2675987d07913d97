//! Command-line argument parsing with clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Helix CLI - client for the Helix compute/data platform.
#[derive(Parser, Debug, Clone)]
#[command(name = "helix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Apiserver base URL to call.
    #[arg(long, env = "HELIX_APISERVER_URL")]
    pub apiserver: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Print bare IDs instead of progress messages.
    #[arg(long)]
    pub brief: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable output.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Launch an applet or app.
    Run(RunArgs),

    /// Build an applet from pipeline sources.
    Build(BuildArgs),

    /// Extract data from a dataset.
    Extract {
        /// Extraction subcommand to execute.
        #[command(subcommand)]
        command: ExtractCommands,
    },

    /// Describe a platform object by path or ID.
    Describe(DescribeArgs),
}

/// Arguments for the run command.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Executable to run: an applet path or ID, or an app-<name> reference.
    pub executable: String,

    /// Input value as <name>=<value>; repeatable.
    ///
    /// Values are parsed per the executable's input spec: data classes take
    /// paths or IDs, and `job-xxxx:field` selects a job's output.
    #[arg(short = 'i', long = "input", value_name = "NAME=VALUE")]
    pub input: Vec<String>,

    /// The whole input hash as a JSON string.
    #[arg(short = 'j', long = "input-json", value_name = "JSON")]
    pub input_json: Option<String>,

    /// File containing the input hash; "-" reads standard input.
    #[arg(short = 'f', long = "input-json-file", value_name = "FILE")]
    pub input_json_file: Option<String>,

    /// Name for the launched job.
    #[arg(long)]
    pub name: Option<String>,

    /// Destination folder for job outputs.
    #[arg(long)]
    pub folder: Option<String>,

    /// Block until the job reaches a terminal state.
    #[arg(long)]
    pub watch: bool,
}

/// Arguments for the build command.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Build a Nextflow pipeline applet.
    #[arg(long)]
    pub nextflow: bool,

    /// Pipeline resources directory.
    #[arg(default_value = ".")]
    pub src_dir: String,

    /// Import the pipeline from a git repository instead of a local
    /// directory, via the platform's pipeline importer.
    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Tag or branch of the repository to import.
    #[arg(long, requires = "repository")]
    pub tag: Option<String>,

    /// Nextflow configuration profile to bake into the applet.
    #[arg(long)]
    pub profile: Option<String>,

    /// GitHub credentials file (ID or project:id) for private repositories.
    #[arg(long, value_name = "FILE", requires = "repository")]
    pub github_credentials: Option<String>,
}

/// Extraction subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ExtractCommands {
    /// Extract somatic variant rows from a dataset record.
    Somatic(SomaticArgs),
}

/// Arguments for somatic extraction.
#[derive(Args, Debug, Clone)]
pub struct SomaticArgs {
    /// Dataset record path or ID.
    pub record: String,

    /// Retrieve variant rows matching the filter document.
    #[arg(long)]
    pub retrieve_variant: bool,

    /// Filter document as a JSON string.
    #[arg(long, value_name = "JSON", conflicts_with = "filter_json_file")]
    pub filter_json: Option<String>,

    /// File containing the filter document; "-" reads standard input.
    #[arg(long, value_name = "FILE")]
    pub filter_json_file: Option<String>,

    /// Assay to query; the record's first somatic assay when absent.
    #[arg(long)]
    pub assay_name: Option<String>,

    /// Print the assembled payload instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the describe command.
#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    /// Object path or ID.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_parses_run_with_inputs() {
        let cli = Cli::parse_from([
            "helix",
            "run",
            "app-bwa_mem",
            "-i",
            "reads=file-B5QF8pQ04QJzx0xKzZ8rTkYv",
            "-i",
            "threads=4",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.executable, "app-bwa_mem");
                assert_eq!(args.input.len(), 2);
                assert!(!args.watch);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn cli_parses_build_nextflow_repository() {
        let cli = Cli::parse_from([
            "helix",
            "build",
            "--nextflow",
            "--repository",
            "https://github.com/example/rnaseq",
            "--tag",
            "v1.0",
        ]);
        match cli.command {
            Commands::Build(args) => {
                assert!(args.nextflow);
                assert_eq!(
                    args.repository.as_deref(),
                    Some("https://github.com/example/rnaseq")
                );
                assert_eq!(args.tag.as_deref(), Some("v1.0"));
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn cli_rejects_tag_without_repository() {
        let result = Cli::try_parse_from(["helix", "build", "--nextflow", "--tag", "v1.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_extract_somatic() {
        let cli = Cli::parse_from([
            "helix",
            "extract",
            "somatic",
            "record-A1b2C3d4E5f6G7h8J9k0L1m2",
            "--retrieve-variant",
            "--filter-json",
            "{}",
        ]);
        match cli.command {
            Commands::Extract { command } => {
                let ExtractCommands::Somatic(args) = command;
                assert!(args.retrieve_variant);
                assert_eq!(args.filter_json.as_deref(), Some("{}"));
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn cli_rejects_both_filter_sources() {
        let result = Cli::try_parse_from([
            "helix",
            "extract",
            "somatic",
            "rec",
            "--filter-json",
            "{}",
            "--filter-json-file",
            "f.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["helix", "--format", "json", "describe", "file-x"]);
        assert_eq!(cli.format, Format::Json);
    }
}
