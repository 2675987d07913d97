//! Per-class parsing of input values given on the command line.

use serde_json::{json, Value};

use helix_client::resolver::split_unescaped;
use helix_client::ApiClient;
use helix_proto::{is_hash_id, is_job_id, BaseClass, InputClass, ObjectLink};

use crate::error::CliError;

/// Parse a boolean the lenient way: any non-empty prefix of `true`/`false`
/// (case-insensitive), plus `1` and `0`.
///
/// # Errors
///
/// Returns an error for anything else.
pub fn parse_bool(s: &str) -> Result<bool, CliError> {
    if !s.is_empty() {
        let lower = s.to_lowercase();
        if "true".starts_with(&lower) || s == "1" {
            return Ok(true);
        }
        if "false".starts_with(&lower) || s == "0" {
            return Ok(false);
        }
    }
    Err(CliError::InvalidInput(format!(
        "could not resolve \"{s}\" to a boolean"
    )))
}

/// Recognize `job-xxxx:field` syntax as a job output reference.
#[must_use]
pub fn parse_job_ref(value: &str) -> Option<Value> {
    let parts = split_unescaped(':', value);
    if parts.len() == 2 && is_job_id(&parts[0]) {
        Some(json!({ "job": parts[0], "field": parts[1] }))
    } else {
        None
    }
}

/// Parses input values against their declared class.
///
/// Data classes (file, record, applet) resolve paths and IDs through the
/// platform; everything else parses locally.
#[derive(Debug, Clone, Copy)]
pub struct InputParser<'a> {
    client: &'a ApiClient,
}

impl<'a> InputParser<'a> {
    /// Create a parser backed by `client`.
    #[must_use]
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The backing client.
    #[must_use]
    pub fn client(&self) -> &'a ApiClient {
        self.client
    }

    /// Parse a value for `class`, recognizing job output references first.
    ///
    /// For array classes the value is parsed as a single element of the
    /// array's base class.
    ///
    /// # Errors
    ///
    /// Returns an error when the value does not parse for the class.
    pub async fn parse_input_or_jor(
        &self,
        class: InputClass,
        value: &str,
    ) -> Result<Value, CliError> {
        if let Some(job_ref) = parse_job_ref(value) {
            return Ok(job_ref);
        }
        self.parse_scalar(class.base, value).await
    }

    /// Parse a scalar value of the given base class.
    ///
    /// # Errors
    ///
    /// Returns an error when the value does not parse for the class.
    pub async fn parse_scalar(&self, base: BaseClass, value: &str) -> Result<Value, CliError> {
        match base {
            BaseClass::Boolean => Ok(Value::Bool(parse_bool(value)?)),
            BaseClass::String => Ok(Value::String(value.to_string())),
            BaseClass::Int => value.parse::<i64>().map(Value::from).map_err(|_| {
                CliError::InvalidInput(format!("could not parse \"{value}\" as an int"))
            }),
            BaseClass::Float => {
                let parsed: f64 = value.parse().map_err(|_| {
                    CliError::InvalidInput(format!("could not parse \"{value}\" as a float"))
                })?;
                serde_json::Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| {
                        CliError::InvalidInput(format!("non-finite float value: {value}"))
                    })
            }
            BaseClass::Hash => serde_json::from_str(value).map_err(|e| {
                CliError::InvalidInput(format!("invalid JSON for a hash input: {e}"))
            }),
            // Jobs and apps become bare links without resolution.
            BaseClass::Job | BaseClass::App => Ok(ObjectLink::bare(value).into_value()),
            BaseClass::File | BaseClass::Record | BaseClass::Applet => {
                self.resolve_object(base, value).await
            }
        }
    }

    async fn resolve_object(&self, base: BaseClass, value: &str) -> Result<Value, CliError> {
        if value.is_empty() {
            return Err(CliError::InvalidInput(
                "an empty string cannot be resolved to an object".to_string(),
            ));
        }
        let object = self.client.resolve_existing(value).await?.into_object(value)?;
        match object.class() {
            Some(class) if class == base.as_str() => {}
            Some(class) => {
                return Err(CliError::InvalidInput(format!(
                    "the given object is of class {class} but an object of class {base} \
                     was expected"
                )));
            }
            None => {
                return Err(CliError::InvalidInput(format!(
                    "could not determine the class of \"{value}\""
                )));
            }
        }
        // Hash-ID input keeps a bare link; named paths get project-qualified.
        let link = if is_hash_id(value) {
            ObjectLink::bare(object.id)
        } else {
            match object.project {
                Some(project) => ObjectLink::qualified(project, object.id),
                None => ObjectLink::bare(object.id),
            }
        };
        Ok(link.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_client::ApiConfig;
    use helix_proto::InputClass;

    fn parser_client() -> ApiClient {
        ApiClient::new(ApiConfig::new("http://127.0.0.1:1", "tok")).expect("client")
    }

    #[test]
    fn parse_bool_accepts_prefixes() {
        assert!(parse_bool("true").expect("true"));
        assert!(parse_bool("t").expect("t"));
        assert!(parse_bool("TR").expect("TR"));
        assert!(parse_bool("1").expect("1"));
        assert!(!parse_bool("false").expect("false"));
        assert!(!parse_bool("F").expect("F"));
        assert!(!parse_bool("0").expect("0"));
    }

    #[test]
    fn parse_bool_rejects_everything_else() {
        assert!(parse_bool("").is_err());
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("truthy").is_err());
        assert!(parse_bool("10").is_err());
    }

    #[test]
    fn job_ref_requires_job_id_and_single_colon() {
        let value = parse_job_ref("job-A1b2C3d4E5f6G7h8J9k0L1m2:reads").expect("job ref");
        assert_eq!(
            value,
            json!({ "job": "job-A1b2C3d4E5f6G7h8J9k0L1m2", "field": "reads" })
        );
        assert!(parse_job_ref("file-B5QF8pQ04QJzx0xKzZ8rTkYv:reads").is_none());
        assert!(parse_job_ref("job-A1b2C3d4E5f6G7h8J9k0L1m2").is_none());
        assert!(parse_job_ref("job-A1b2C3d4E5f6G7h8J9k0L1m2:a:b").is_none());
    }

    #[tokio::test]
    async fn scalar_classes_parse_locally() {
        let client = parser_client();
        let parser = InputParser::new(&client);

        assert_eq!(
            parser
                .parse_scalar(BaseClass::Int, "42")
                .await
                .expect("int"),
            json!(42)
        );
        assert_eq!(
            parser
                .parse_scalar(BaseClass::Float, "2.5")
                .await
                .expect("float"),
            json!(2.5)
        );
        assert_eq!(
            parser
                .parse_scalar(BaseClass::String, "a b c")
                .await
                .expect("string"),
            json!("a b c")
        );
        assert_eq!(
            parser
                .parse_scalar(BaseClass::Hash, r#"{"a": 1}"#)
                .await
                .expect("hash"),
            json!({ "a": 1 })
        );
    }

    #[tokio::test]
    async fn int_parse_failure_names_the_class() {
        let client = parser_client();
        let parser = InputParser::new(&client);
        let err = parser
            .parse_scalar(BaseClass::Int, "four")
            .await
            .expect_err("not an int");
        assert!(err.to_string().contains("as an int"));
    }

    #[tokio::test]
    async fn job_class_becomes_bare_link() {
        let client = parser_client();
        let parser = InputParser::new(&client);
        let value = parser
            .parse_scalar(BaseClass::Job, "job-A1b2C3d4E5f6G7h8J9k0L1m2")
            .await
            .expect("job link");
        assert_eq!(value, json!({ "$helix_link": "job-A1b2C3d4E5f6G7h8J9k0L1m2" }));
    }

    #[tokio::test]
    async fn jor_takes_precedence_over_class_parse() {
        let client = parser_client();
        let parser = InputParser::new(&client);
        let value = parser
            .parse_input_or_jor(
                InputClass::parse("array:file").expect("class"),
                "job-A1b2C3d4E5f6G7h8J9k0L1m2:mapped",
            )
            .await
            .expect("job ref");
        assert_eq!(
            value,
            json!({ "job": "job-A1b2C3d4E5f6G7h8J9k0L1m2", "field": "mapped" })
        );
    }

    #[tokio::test]
    async fn empty_data_object_value_is_rejected() {
        let client = parser_client();
        let parser = InputParser::new(&client);
        let err = parser
            .parse_scalar(BaseClass::File, "")
            .await
            .expect_err("empty");
        assert!(err.to_string().contains("empty string"));
    }
}
