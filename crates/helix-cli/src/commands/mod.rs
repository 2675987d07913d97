//! CLI command implementations.
//!
//! Each command owns its execution logic and writes through the shared
//! output formatter; `main` only dispatches.

pub mod build;
pub mod describe;
pub mod extract;
pub mod run;

pub use build::BuildCommand;
pub use describe::DescribeCommand;
pub use extract::SomaticCommand;
pub use run::RunCommand;
