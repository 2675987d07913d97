//! # helix-pipeline
//!
//! Turns a Nextflow pipeline into a Helix applet.
//!
//! Two paths lead there:
//!
//! - **Local preparation** ([`prepare`]): read the pipeline's
//!   `nextflow_schema.json`, generate the applet descriptor and launcher
//!   script into a build directory next to the user's pipeline files.
//! - **Remote import** ([`import_from_repository`]): hand a git repository
//!   URL to the platform's pipeline importer app and wait for the job that
//!   builds the applet server-side.
//!
//! Descriptor generation is pure; only the remote import talks to the
//! platform.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod schema;
pub mod templates;

pub use builder::{import_from_repository, prepare, ImportOptions, ImportOutcome, IMPORTER_APP};
pub use error::PipelineError;
pub use schema::{inputs_from_schema_file, inputs_from_schema_str};
pub use templates::{default_run_params, descriptor, launcher_script, AppletDescriptor};
