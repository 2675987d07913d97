//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A launched job.
#[derive(Debug, Clone, Serialize)]
pub struct JobLaunched {
    /// The job's ID.
    pub id: String,
}

impl TableDisplay for JobLaunched {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Started job {}", self.id)?;
        Ok(())
    }
}

/// A job that reached a terminal state while being watched.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    /// The job's ID.
    pub id: String,
    /// The terminal state.
    pub state: String,
    /// The job's output hash, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,
}

impl TableDisplay for JobOutcome {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Job {} is {}", self.id, self.state)?;
        if let Some(output) = &self.output {
            let rendered = serde_json::to_string_pretty(output)
                .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
            writeln!(writer, "Output:")?;
            writeln!(writer, "{rendered}")?;
        }
        Ok(())
    }
}

/// Result of a pipeline build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    /// The created applet, for repository imports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applet_id: Option<String>,
    /// The importer job that ran, for repository imports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// The prepared build directory, for local builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<String>,
}

impl TableDisplay for BuildOutcome {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if let Some(applet_id) = &self.applet_id {
            writeln!(writer, "Created Nextflow pipeline {applet_id}")?;
        }
        if let Some(build_dir) = &self.build_dir {
            writeln!(writer, "Prepared pipeline build directory {build_dir}")?;
        }
        Ok(())
    }
}

/// Variant rows returned by an extraction query.
#[derive(Debug, Clone, Serialize)]
pub struct VariantRows {
    /// Column order for tabular output.
    pub fields: Vec<String>,
    /// The returned rows.
    pub rows: Vec<Map<String, Value>>,
}

impl TableDisplay for VariantRows {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.fields.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = self
                .fields
                .iter()
                .map(|field| match row.get(field) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                })
                .collect();
            writeln!(writer, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

/// Describe output for any object.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DescribeOutput(pub Value);

// Fields worth surfacing in table mode, in display order.
const SUMMARY_FIELDS: [&str; 7] = ["id", "class", "name", "project", "folder", "state", "created"];

impl TableDisplay for DescribeOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for field in SUMMARY_FIELDS {
            if let Some(value) = self.0.get(field) {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                writeln!(writer, "{field:<12}{rendered}")?;
            }
        }
        Ok(())
    }
}

/// A payload printed by a dry run.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PayloadOutput<T: Serialize>(pub T);

impl<T: Serialize> TableDisplay for PayloadOutput<T> {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let rendered = serde_json::to_string_pretty(&self.0)
            .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
        writeln!(writer, "{rendered}")?;
        Ok(())
    }
}
