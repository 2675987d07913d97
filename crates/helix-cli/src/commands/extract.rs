//! Somatic extraction command implementation.
//!
//! Resolves the dataset record, assembles the somatic filter payload, and
//! POSTs it to the record's query route.

use std::fs;
use std::io::{Read, Write};

use serde_json::{Map, Value};
use tracing::debug;

use helix_client::ApiClient;
use helix_filter::final_payload;

use crate::cli::SomaticArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, PayloadOutput, VariantRows};

/// Somatic extraction command executor.
pub struct SomaticCommand<'a> {
    client: &'a ApiClient,
}

impl<'a> SomaticCommand<'a> {
    /// Create a new somatic extraction command.
    #[must_use]
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Execute the extraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be resolved, carries no
    /// matching somatic assay, or the filter document is malformed.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &SomaticArgs,
    ) -> Result<(), CliError> {
        if !args.retrieve_variant {
            return Err(CliError::InvalidArgument(
                "nothing to extract; pass --retrieve-variant".to_string(),
            ));
        }
        let document = self.filter_document(args)?;

        let record = self
            .client
            .resolve_existing(&args.record)
            .await?
            .into_object(&args.record)?;
        if record.class() != Some("record") {
            return Err(CliError::InvalidArgument(format!(
                "{} is not a dataset record",
                args.record
            )));
        }

        let (assay_name, assay_id) =
            select_assay(&record.describe, args.assay_name.as_deref())?;
        debug!(assay = %assay_name, "selected somatic assay");

        let project = match &record.project {
            Some(project) => project.clone(),
            None => self.client.config().project_context_or_err()?.to_string(),
        };

        let (payload, field_names) = final_payload(&document, &assay_name, &assay_id, &project)?;
        if args.dry_run {
            format.write(writer, &PayloadOutput(payload))?;
            return Ok(());
        }

        let payload = serde_json::to_value(&payload)
            .map_err(|e| CliError::Format(format!("unencodable payload: {e}")))?;
        let body = self
            .client
            .call(&format!("{}/query", record.id), &payload)
            .await?;

        let rows: Vec<Map<String, Value>> = body
            .get("results")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row.as_object().cloned())
                    .collect()
            })
            .unwrap_or_default();

        format.write(writer, &VariantRows {
            fields: field_names,
            rows,
        })?;
        Ok(())
    }

    // Exactly one filter source must be given.
    fn filter_document(&self, args: &SomaticArgs) -> Result<Map<String, Value>, CliError> {
        let text = match (&args.filter_json, &args.filter_json_file) {
            (Some(text), None) => text.clone(),
            (None, Some(path)) if path == "-" => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
            (None, Some(path)) => fs::read_to_string(path)?,
            _ => {
                return Err(CliError::InvalidArgument(
                    "provide the filter with --filter-json or --filter-json-file".to_string(),
                ));
            }
        };
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| CliError::InvalidInput(format!("error while parsing filter JSON: {e}")))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(CliError::InvalidInput(
                "the filter document must be a JSON object".to_string(),
            )),
        }
    }
}

/// Pick the assay to query from a record's describe details.
///
/// With `wanted` set, the assay must exist by name and be somatic;
/// otherwise the record's first somatic assay wins.
fn select_assay(describe: &Value, wanted: Option<&str>) -> Result<(String, String), CliError> {
    let assays = describe
        .get("details")
        .and_then(|details| details.get("assays"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut somatic = assays.iter().filter_map(|assay| {
        let model = assay.get("generalized_assay_model").and_then(Value::as_str)?;
        if model != "somatic" {
            return None;
        }
        let name = assay.get("name").and_then(Value::as_str)?;
        let id = assay.get("id").and_then(Value::as_str)?;
        Some((name.to_string(), id.to_string()))
    });

    match wanted {
        Some(wanted) => somatic
            .find(|(name, _)| name == wanted)
            .ok_or_else(|| {
                CliError::InvalidArgument(format!("no somatic assay named \"{wanted}\""))
            }),
        None => somatic.next().ok_or_else(|| {
            CliError::InvalidArgument("the record has no somatic assays".to_string())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_describe() -> Value {
        json!({
            "id": "record-A1b2C3d4E5f6G7h8J9k0L1m2",
            "class": "record",
            "details": {
                "assays": [
                    {
                        "name": "germline_assay",
                        "id": "0af1bf1b-0000-0000-0000-000000000001",
                        "generalized_assay_model": "germline",
                    },
                    {
                        "name": "tumor_panel",
                        "id": "f6a09c05-a1ea-4eb8-a8c1-6663992007a6",
                        "generalized_assay_model": "somatic",
                    },
                    {
                        "name": "tumor_panel_v2",
                        "id": "f6a09c05-a1ea-4eb8-a8c1-6663992007a7",
                        "generalized_assay_model": "somatic",
                    },
                ],
            },
        })
    }

    #[test]
    fn first_somatic_assay_is_the_default() {
        let (name, id) = select_assay(&record_describe(), None).expect("assay");
        assert_eq!(name, "tumor_panel");
        assert_eq!(id, "f6a09c05-a1ea-4eb8-a8c1-6663992007a6");
    }

    #[test]
    fn named_assay_is_honored() {
        let (name, _) = select_assay(&record_describe(), Some("tumor_panel_v2")).expect("assay");
        assert_eq!(name, "tumor_panel_v2");
    }

    #[test]
    fn germline_assay_cannot_be_selected() {
        let err = select_assay(&record_describe(), Some("germline_assay")).expect_err("germline");
        assert!(err.to_string().contains("no somatic assay"));
    }

    #[test]
    fn record_without_assays_errors() {
        let err = select_assay(&json!({ "details": {} }), None).expect_err("none");
        assert!(err.to_string().contains("no somatic assays"));
    }
}
