//! Job input assembly.
//!
//! Inputs arrive three ways, applied in order: a JSON file (`-f`, with `-`
//! for stdin), a JSON string (`-j`), and repeated `-i name=value` pairs.
//! Values are parsed against the executable's input spec when it has one;
//! without a spec, values go through an untyped cascade (job reference,
//! JSON, path resolution, raw string). Whatever is still missing afterwards
//! is prompted for on a terminal.

pub mod parse;
pub mod prompt;

use std::fs;
use std::io::Read;

use serde_json::{Map, Value};
use tracing::debug;

use helix_client::resolver::{split_once_unescaped, unescape, Resolution};
use helix_client::ApiClient;
use helix_proto::{is_hash_id, InputClass, InputParam, ObjectLink};

use crate::error::CliError;

pub use parse::{parse_bool, parse_job_ref, InputParser};
pub use prompt::Prompter;

/// Accumulates the input hash for one executable run.
pub struct ExecutableInputs<'a> {
    parser: InputParser<'a>,
    spec: Option<Vec<InputParam>>,
    inputs: Map<String, Value>,
    input_name_prefix: Option<String>,
}

impl<'a> ExecutableInputs<'a> {
    /// Build from an executable's describe output.
    ///
    /// An absent `inputSpec` leaves the instance spec-less: every value then
    /// goes through the untyped cascade.
    ///
    /// # Errors
    ///
    /// Returns an error when the describe carries an unreadable input spec.
    pub fn new(client: &'a ApiClient, describe: &Value) -> Result<Self, CliError> {
        let spec = match describe.get("inputSpec") {
            Some(entries @ Value::Array(_)) => Some(
                serde_json::from_value::<Vec<InputParam>>(entries.clone())
                    .map_err(|e| CliError::InvalidInput(format!("unreadable input spec: {e}")))?,
            ),
            _ => None,
        };
        Ok(Self {
            parser: InputParser::new(client),
            spec,
            inputs: Map::new(),
            input_name_prefix: None,
        })
    }

    /// Only accept inputs whose names carry `prefix`, stripping it.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.input_name_prefix = Some(prefix.into());
        self
    }

    /// Whether the executable published an input spec.
    #[must_use]
    pub fn has_input_spec(&self) -> bool {
        self.spec.is_some()
    }

    /// The backing parser.
    #[must_use]
    pub fn parser(&self) -> InputParser<'a> {
        self.parser
    }

    /// Look up a spec entry by name.
    #[must_use]
    pub fn spec_param(&self, name: &str) -> Option<&InputParam> {
        self.spec
            .as_deref()
            .and_then(|spec| spec.iter().find(|p| p.name == name))
    }

    /// Required parameter names, in spec order.
    #[must_use]
    pub fn required_names(&self) -> Vec<String> {
        self.spec
            .as_deref()
            .map(|spec| {
                spec.iter()
                    .filter(|p| p.is_required())
                    .map(|p| p.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Optional parameter names, in spec order.
    #[must_use]
    pub fn optional_names(&self) -> Vec<String> {
        self.spec
            .as_deref()
            .map(|spec| {
                spec.iter()
                    .filter(|p| !p.is_required())
                    .map(|p| p.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether a value has been set for `name`.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    /// The current value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inputs.get(name)
    }

    /// Whether nothing has been set yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Set a value directly.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.inputs.insert(name.into(), value);
    }

    /// Required inputs that still have no value.
    #[must_use]
    pub fn missing_required(&self) -> Vec<String> {
        self.required_names()
            .into_iter()
            .filter(|name| !self.is_set(name))
            .collect()
    }

    /// Merge a whole input hash.
    ///
    /// With `strip_prefix` set and a prefix configured, only prefixed names
    /// are taken (stripped); everything else is merged as-is.
    pub fn update(&mut self, new_inputs: Map<String, Value>, strip_prefix: bool) {
        match (&self.input_name_prefix, strip_prefix) {
            (Some(prefix), true) => {
                for (name, value) in new_inputs {
                    if let Some(stripped) = name.strip_prefix(prefix.as_str()) {
                        self.inputs.insert(stripped.to_string(), value);
                    }
                }
            }
            _ => self.inputs.extend(new_inputs),
        }
    }

    /// Merge an input hash given as JSON text. `source` names the origin in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a JSON object.
    pub fn update_from_json(&mut self, text: &str, source: &str) -> Result<(), CliError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CliError::InvalidInput(format!("error while parsing {source}: {e}")))?;
        match value {
            Value::Object(map) => {
                self.update(map, true);
                Ok(())
            }
            _ => Err(CliError::InvalidInput(format!(
                "{source} must contain a JSON object"
            ))),
        }
    }

    /// Merge an input hash from a file, with `-` reading standard input.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not a JSON
    /// object.
    pub fn update_from_file(&mut self, path: &str) -> Result<(), CliError> {
        let contents = if path == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            fs::read_to_string(path)?
        };
        self.update_from_json(&contents, &format!("input JSON file {path}"))
    }

    /// Add one `-i name=value` style input.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown fields (against a known spec) or values
    /// that fail to parse for their class.
    pub async fn add(&mut self, name: &str, value: &str) -> Result<(), CliError> {
        let mut name = name.to_string();
        if let Some(prefix) = &self.input_name_prefix {
            match name.strip_prefix(prefix.as_str()) {
                Some(stripped) => name = stripped.to_string(),
                // Inputs without the prefix belong to someone else.
                None => return Ok(()),
            }
        }

        // `name:class` syntax carries an explicit class when there is no
        // spec to consult.
        let mut explicit_class = None;
        if self.spec.is_none() {
            if let Some(index) = name.find(':') {
                explicit_class = Some(InputClass::parse(&name[index + 1..])?);
                name.truncate(index);
            }
        }

        let class = match self.spec.as_deref() {
            Some(_) => Some(
                self.spec_param(&name)
                    .map(|p| p.class)
                    .ok_or_else(|| CliError::UnknownInputField(name.clone()))?,
            ),
            None => explicit_class,
        };

        match class {
            Some(class) => {
                let parsed = self.parser.parse_input_or_jor(class, value).await?;
                if class.array {
                    self.push_array(&name, parsed);
                } else {
                    self.inputs.insert(name, parsed);
                }
            }
            None => {
                let parsed = self.parse_untyped(value).await;
                self.push_array(&name, parsed);
            }
        }
        Ok(())
    }

    // The untyped cascade: job reference, then JSON (objects, arrays, and
    // numbers only), then path resolution, then the raw string.
    async fn parse_untyped(&self, value: &str) -> Value {
        if let Some(job_ref) = parse_job_ref(value) {
            return job_ref;
        }
        if let Ok(parsed) = serde_json::from_str::<Value>(value) {
            if matches!(
                parsed,
                Value::Object(_) | Value::Array(_) | Value::Number(_)
            ) {
                return parsed;
            }
        }
        match self.parser.client().resolve_existing(value).await {
            Ok(Resolution::Object(object)) => {
                let link = if is_hash_id(value) {
                    ObjectLink::bare(object.id)
                } else {
                    match object.project {
                        Some(project) => ObjectLink::qualified(project, object.id),
                        None => ObjectLink::bare(object.id),
                    }
                };
                link.into_value()
            }
            // Not resolvable: leave it as a string.
            _ => Value::String(value.to_string()),
        }
    }

    fn push_array(&mut self, name: &str, value: Value) {
        match self.inputs.get_mut(name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, value]);
            }
            None => {
                self.inputs
                    .insert(name.to_string(), Value::Array(vec![value]));
            }
        }
    }

    /// Apply the three input sources in order: file, JSON string, `-i`
    /// pairs. Without a spec, single-element value lists collapse to
    /// scalars afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error for unreadable sources, malformed pairs, or values
    /// that fail to parse.
    pub async fn update_from_args(
        &mut self,
        file: Option<&str>,
        json_text: Option<&str>,
        pairs: &[String],
    ) -> Result<(), CliError> {
        if let Some(path) = file {
            self.update_from_file(path)?;
        }
        if let Some(text) = json_text {
            self.update_from_json(text, "input JSON")?;
        }
        for pair in pairs {
            let (name, value) = split_once_unescaped('=', pair).ok_or_else(|| {
                CliError::InvalidArgument(
                    "an input was found that did not conform to the syntax: \
                     -i<input name>=<input value>"
                        .to_string(),
                )
            })?;
            self.add(&unescape(name), value).await?;
        }

        if self.spec.is_none() {
            self.collapse_singletons();
        }
        debug!(inputs = self.inputs.len(), "assembled input hash");
        Ok(())
    }

    // Untyped values accumulate in lists; lists of one almost always mean a
    // scalar was intended.
    fn collapse_singletons(&mut self) {
        for value in self.inputs.values_mut() {
            let single = match value {
                Value::Array(items) if items.len() == 1 => items.pop(),
                _ => None,
            };
            if let Some(single) = single {
                *value = single;
            }
        }
    }

    /// Consume the builder, yielding the final input hash.
    #[must_use]
    pub fn into_input_hash(self) -> Map<String, Value> {
        self.inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_client::ApiConfig;
    use serde_json::json;

    fn client() -> ApiClient {
        // Unreachable apiserver: resolution attempts fail fast, exercising
        // the fall-back-to-string branch of the untyped cascade.
        ApiClient::new(ApiConfig::new("http://127.0.0.1:1", "tok")).expect("client")
    }

    fn spec_describe() -> Value {
        json!({
            "id": "applet-B5QF8pQ04QJzx0xKzZ8rTkYv",
            "class": "applet",
            "inputSpec": [
                { "name": "genome", "class": "string" },
                { "name": "threads", "class": "int", "default": 4 },
                { "name": "tags", "class": "array:string", "optional": true },
                { "name": "verbose", "class": "boolean", "optional": true },
            ],
        })
    }

    #[tokio::test]
    async fn add_parses_against_spec_classes() {
        let client = client();
        let mut inputs = ExecutableInputs::new(&client, &spec_describe()).expect("inputs");
        inputs.add("genome", "GRCh38").await.expect("string");
        inputs.add("threads", "8").await.expect("int");
        inputs.add("verbose", "t").await.expect("bool");

        let hash = inputs.into_input_hash();
        assert_eq!(hash.get("genome"), Some(&json!("GRCh38")));
        assert_eq!(hash.get("threads"), Some(&json!(8)));
        assert_eq!(hash.get("verbose"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn add_appends_array_classes() {
        let client = client();
        let mut inputs = ExecutableInputs::new(&client, &spec_describe()).expect("inputs");
        inputs.add("tags", "alpha").await.expect("first");
        inputs.add("tags", "beta").await.expect("second");
        assert_eq!(
            inputs.into_input_hash().get("tags"),
            Some(&json!(["alpha", "beta"]))
        );
    }

    #[tokio::test]
    async fn add_rejects_unknown_fields_against_spec() {
        let client = client();
        let mut inputs = ExecutableInputs::new(&client, &spec_describe()).expect("inputs");
        let err = inputs.add("genom", "GRCh38").await.expect_err("unknown");
        assert!(matches!(err, CliError::UnknownInputField(_)));
    }

    #[tokio::test]
    async fn missing_required_honors_defaults_and_optionals() {
        let client = client();
        let inputs = ExecutableInputs::new(&client, &spec_describe()).expect("inputs");
        // threads has a default, tags/verbose are optional: only genome is
        // required.
        assert_eq!(inputs.missing_required(), vec!["genome".to_string()]);
    }

    #[tokio::test]
    async fn untyped_cascade_prefers_job_refs_and_json() {
        let client = client();
        let describe = json!({ "id": "applet-B5QF8pQ04QJzx0xKzZ8rTkYv" });
        let mut inputs = ExecutableInputs::new(&client, &describe).expect("inputs");
        assert!(!inputs.has_input_spec());

        inputs
            .update_from_args(
                None,
                None,
                &[
                    "ref=job-A1b2C3d4E5f6G7h8J9k0L1m2:out".to_string(),
                    "conf={\"a\": 1}".to_string(),
                    "count=3".to_string(),
                    "label=hello world".to_string(),
                ],
            )
            .await
            .expect("args");

        let hash = inputs.into_input_hash();
        assert_eq!(
            hash.get("ref"),
            Some(&json!({ "job": "job-A1b2C3d4E5f6G7h8J9k0L1m2", "field": "out" }))
        );
        assert_eq!(hash.get("conf"), Some(&json!({ "a": 1 })));
        assert_eq!(hash.get("count"), Some(&json!(3)));
        // Unresolvable name falls back to the raw string.
        assert_eq!(hash.get("label"), Some(&json!("hello world")));
    }

    #[tokio::test]
    async fn untyped_repeats_accumulate_without_collapsing() {
        let client = client();
        let describe = json!({ "id": "applet-B5QF8pQ04QJzx0xKzZ8rTkYv" });
        let mut inputs = ExecutableInputs::new(&client, &describe).expect("inputs");
        inputs
            .update_from_args(
                None,
                None,
                &["x=1".to_string(), "x=2".to_string(), "y=7".to_string()],
            )
            .await
            .expect("args");

        let hash = inputs.into_input_hash();
        assert_eq!(hash.get("x"), Some(&json!([1, 2])));
        // Single-element lists collapse.
        assert_eq!(hash.get("y"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn explicit_class_syntax_without_spec() {
        let client = client();
        let describe = json!({ "id": "applet-B5QF8pQ04QJzx0xKzZ8rTkYv" });
        let mut inputs = ExecutableInputs::new(&client, &describe).expect("inputs");
        inputs
            .update_from_args(None, None, &["flag:boolean=true".to_string()])
            .await
            .expect("args");
        let hash = inputs.into_input_hash();
        // An explicit scalar class assigns rather than accumulating.
        assert_eq!(hash.get("flag"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn json_merge_then_pairs_override() {
        let client = client();
        let mut inputs = ExecutableInputs::new(&client, &spec_describe()).expect("inputs");
        inputs
            .update_from_args(
                None,
                Some(r#"{ "genome": "GRCh37", "threads": 2 }"#),
                &["genome=GRCh38".to_string()],
            )
            .await
            .expect("args");
        let hash = inputs.into_input_hash();
        assert_eq!(hash.get("genome"), Some(&json!("GRCh38")));
        assert_eq!(hash.get("threads"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn malformed_pair_is_an_argument_error() {
        let client = client();
        let mut inputs = ExecutableInputs::new(&client, &spec_describe()).expect("inputs");
        let err = inputs
            .update_from_args(None, None, &["genome".to_string()])
            .await
            .expect_err("no equals");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn non_object_json_is_rejected() {
        let client = client();
        let mut inputs = ExecutableInputs::new(&client, &spec_describe()).expect("inputs");
        let err = inputs
            .update_from_json("[1, 2]", "input JSON")
            .expect_err("array");
        assert!(err.to_string().contains("JSON object"));
    }

    #[tokio::test]
    async fn prefix_filters_and_strips() {
        let client = client();
        let mut inputs = ExecutableInputs::new(&client, &spec_describe())
            .expect("inputs")
            .with_prefix("stage0.");
        inputs.add("stage0.genome", "GRCh38").await.expect("kept");
        inputs.add("other.genome", "GRCh37").await.expect("skipped");
        let hash = inputs.into_input_hash();
        assert_eq!(hash.get("genome"), Some(&json!("GRCh38")));
        assert_eq!(hash.len(), 1);
    }
}
