//! # helix-cli
//!
//! The `helix` command-line tool.
//!
//! Provides commands for:
//! - Launching applets and apps with assembled job inputs (`run`)
//! - Building Nextflow pipeline applets (`build --nextflow`)
//! - Extracting somatic variant data (`extract somatic`)
//! - Describing any platform object (`describe`)
//!
//! # Architecture
//!
//! Every command shapes a JSON payload and sends it through
//! [`helix_client::ApiClient`]; nothing is computed locally beyond payload
//! assembly and response formatting. Input values given as `-i name=value`
//! are parsed against the executable's input spec, and missing required
//! inputs are prompted for interactively on a terminal.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod inputs;
pub mod output;

pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use inputs::ExecutableInputs;
pub use output::OutputFormat;
