//! Nextflow schema conversion.
//!
//! A pipeline's `nextflow_schema.json` groups its parameters under
//! `definitions.<group>.properties`; each definition lists its required
//! parameter names. This module converts those properties into platform
//! input params for the generated applet's input spec.

use std::fs;
use std::path::Path;

use serde_json::Value;

use helix_proto::{BaseClass, InputClass, InputParam};

use crate::error::PipelineError;

const DEFAULT_HELP: &str = "No help provided by the pipeline schema";

/// Convert a schema file into input params.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn inputs_from_schema_file(path: &Path) -> Result<Vec<InputParam>, PipelineError> {
    let contents = fs::read_to_string(path)?;
    inputs_from_schema_str(&contents)
}

/// Convert schema JSON text into input params.
///
/// Properties missing from their definition's `required` list are marked
/// optional and their help text gains an `(Optional)` prefix.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON.
pub fn inputs_from_schema_str(contents: &str) -> Result<Vec<InputParam>, PipelineError> {
    let schema: Value = serde_json::from_str(contents)
        .map_err(|e| PipelineError::InvalidSchema(e.to_string()))?;

    let mut inputs = Vec::new();
    let definitions = schema
        .get("definitions")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    for definition in definitions.values() {
        let required: Vec<&str> = definition
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let properties = match definition.get("properties").and_then(Value::as_object) {
            Some(properties) => properties,
            None => continue,
        };

        for (key, property) in properties {
            let mut help = property
                .get("help_text")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_HELP)
                .to_string();

            let mut param = InputParam::new(key.as_str(), class_for(property));
            param.title = Some(key.clone());
            if let Some(default) = property.get("default") {
                param.default = Some(default.clone());
            }
            param.hidden = Some(
                property
                    .get("hidden")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            );
            if !required.contains(&key.as_str()) {
                param.optional = Some(true);
                help = format!("(Optional) {help}");
            }
            param.help = Some(help);
            inputs.push(param);
        }
    }
    Ok(inputs)
}

// JSON-schema types map onto platform input classes; anything unrecognized
// is treated as a string.
fn class_for(property: &Value) -> InputClass {
    let base = match property.get("type").and_then(Value::as_str) {
        Some("integer") => BaseClass::Int,
        Some("number") => BaseClass::Float,
        Some("boolean") => BaseClass::Boolean,
        Some("object") => BaseClass::Hash,
        _ => BaseClass::String,
    };
    InputClass::scalar(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> String {
        json!({
            "definitions": {
                "input_output_options": {
                    "required": ["input"],
                    "properties": {
                        "input": {
                            "type": "string",
                            "help_text": "Path to the samplesheet.",
                        },
                        "outdir": {
                            "type": "string",
                        },
                        "max_retries": {
                            "type": "integer",
                            "default": 3,
                            "hidden": true,
                        },
                        "min_score": { "type": "number" },
                        "skip_qc": { "type": "boolean" },
                        "extra_config": { "type": "object" },
                    },
                },
            },
        })
        .to_string()
    }

    #[test]
    fn required_property_stays_required() {
        let inputs = inputs_from_schema_str(&sample_schema()).expect("parse");
        let input = inputs.iter().find(|p| p.name == "input").expect("present");
        assert!(input.is_required());
        assert_eq!(input.help.as_deref(), Some("Path to the samplesheet."));
    }

    #[test]
    fn optional_property_gets_prefix_and_flag() {
        let inputs = inputs_from_schema_str(&sample_schema()).expect("parse");
        let outdir = inputs.iter().find(|p| p.name == "outdir").expect("present");
        assert!(!outdir.is_required());
        assert_eq!(
            outdir.help.as_deref(),
            Some("(Optional) No help provided by the pipeline schema")
        );
    }

    #[test]
    fn classes_map_from_schema_types() {
        let inputs = inputs_from_schema_str(&sample_schema()).expect("parse");
        let class_of = |name: &str| {
            inputs
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.class.to_string())
                .expect("present")
        };
        assert_eq!(class_of("input"), "string");
        assert_eq!(class_of("max_retries"), "int");
        assert_eq!(class_of("min_score"), "float");
        assert_eq!(class_of("skip_qc"), "boolean");
        assert_eq!(class_of("extra_config"), "hash");
    }

    #[test]
    fn defaults_and_hidden_carry_over() {
        let inputs = inputs_from_schema_str(&sample_schema()).expect("parse");
        let retries = inputs
            .iter()
            .find(|p| p.name == "max_retries")
            .expect("present");
        assert_eq!(retries.default, Some(json!(3)));
        assert_eq!(retries.hidden, Some(true));
        // A default makes the param non-required even without the flag.
        assert!(!retries.is_required());
    }

    #[test]
    fn schema_without_definitions_is_empty() {
        let inputs = inputs_from_schema_str("{}").expect("parse");
        assert!(inputs.is_empty());
    }

    #[test]
    fn invalid_json_is_schema_error() {
        let err = inputs_from_schema_str("not json").expect_err("invalid");
        assert!(matches!(err, PipelineError::InvalidSchema(_)));
    }
}
