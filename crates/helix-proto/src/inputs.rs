//! Executable input specifications.
//!
//! Executables publish an ordered `inputSpec`; each entry names a parameter
//! and its class (`int`, `file`, `array:string`, ...). These types mirror
//! that wire shape exactly — the CLI builds its prompting and parsing
//! behavior on top of them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtoError;

/// The scalar input classes the platform understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseClass {
    /// A boolean flag.
    Boolean,
    /// A signed integer.
    Int,
    /// A floating-point number.
    Float,
    /// A plain string.
    String,
    /// An arbitrary JSON object or array.
    Hash,
    /// A file object on the platform.
    File,
    /// A record object on the platform.
    Record,
    /// An applet object on the platform.
    Applet,
    /// An app, addressed by name.
    App,
    /// A job.
    Job,
}

impl BaseClass {
    /// Parse a base class from its wire name.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown class names.
    pub fn parse(s: &str) -> Result<Self, ProtoError> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "hash" => Ok(Self::Hash),
            "file" => Ok(Self::File),
            "record" => Ok(Self::Record),
            "applet" => Ok(Self::Applet),
            "app" => Ok(Self::App),
            "job" => Ok(Self::Job),
            other => Err(ProtoError::Validation(format!(
                "unknown input class: {other}"
            ))),
        }
    }

    /// The wire name of the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Hash => "hash",
            Self::File => "file",
            Self::Record => "record",
            Self::Applet => "applet",
            Self::App => "app",
            Self::Job => "job",
        }
    }

    /// Whether values of this class are data objects resolved by path or ID.
    #[must_use]
    pub const fn is_data_class(self) -> bool {
        matches!(self, Self::File | Self::Record | Self::Applet)
    }
}

impl fmt::Display for BaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A full input class: a base class, possibly behind an `array:` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InputClass {
    /// The element class.
    pub base: BaseClass,
    /// Whether the parameter takes a list of values.
    pub array: bool,
}

impl InputClass {
    /// A scalar class.
    #[must_use]
    pub const fn scalar(base: BaseClass) -> Self {
        Self { base, array: false }
    }

    /// An array class.
    #[must_use]
    pub const fn array(base: BaseClass) -> Self {
        Self { base, array: true }
    }

    /// Parse a class string such as `"file"` or `"array:string"`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown base classes or nested `array:` prefixes.
    pub fn parse(s: &str) -> Result<Self, ProtoError> {
        if let Some(rest) = s.strip_prefix("array:") {
            if rest.starts_with("array:") {
                return Err(ProtoError::Validation(format!(
                    "nested array class is not allowed: {s}"
                )));
            }
            Ok(Self::array(BaseClass::parse(rest)?))
        } else {
            Ok(Self::scalar(BaseClass::parse(s)?))
        }
    }
}

impl TryFrom<String> for InputClass {
    type Error = ProtoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<InputClass> for String {
    fn from(class: InputClass) -> Self {
        class.to_string()
    }
}

impl fmt::Display for InputClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.array {
            write!(f, "array:{}", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}

/// One entry of an executable's `inputSpec`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputParam {
    /// Parameter name.
    pub name: String,
    /// Parameter class.
    pub class: InputClass,
    /// Whether the parameter is optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Default value, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-facing label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Descriptor title (used by generated applets).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Type constraint for data-object parameters.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<Value>,
    /// Whether the parameter is hidden from generated UIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl InputParam {
    /// Create a parameter with just a name and class.
    #[must_use]
    pub fn new(name: impl Into<String>, class: InputClass) -> Self {
        Self {
            name: name.into(),
            class,
            optional: None,
            default: None,
            label: None,
            title: None,
            help: None,
            type_spec: None,
            hidden: None,
        }
    }

    /// Mark the parameter optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = Some(true);
        self
    }

    /// Attach a default value.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// A parameter is required unless marked optional or given a default.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.optional != Some(true) && self.default.is_none()
    }

    /// The label when present, otherwise the name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn class_parse_scalar_and_array() {
        let c = InputClass::parse("file").expect("scalar");
        assert_eq!(c.base, BaseClass::File);
        assert!(!c.array);

        let c = InputClass::parse("array:string").expect("array");
        assert_eq!(c.base, BaseClass::String);
        assert!(c.array);
        assert_eq!(c.to_string(), "array:string");
    }

    #[test]
    fn class_parse_rejects_nested_array() {
        assert!(InputClass::parse("array:array:int").is_err());
    }

    #[test]
    fn class_parse_rejects_unknown() {
        assert!(InputClass::parse("gtable").is_err());
        assert!(InputClass::parse("").is_err());
    }

    #[test]
    fn data_class_predicate() {
        assert!(BaseClass::File.is_data_class());
        assert!(BaseClass::Applet.is_data_class());
        assert!(!BaseClass::Job.is_data_class());
        assert!(!BaseClass::Int.is_data_class());
    }

    #[test]
    fn param_required_rules() {
        let p = InputParam::new("reads", InputClass::scalar(BaseClass::File));
        assert!(p.is_required());

        let p = InputParam::new("reads", InputClass::scalar(BaseClass::File)).optional();
        assert!(!p.is_required());

        let p = InputParam::new("threads", InputClass::scalar(BaseClass::Int))
            .with_default(json!(4));
        assert!(!p.is_required());
    }

    #[test]
    fn param_deserializes_from_spec_entry() {
        let p: InputParam = serde_json::from_value(json!({
            "name": "mappings",
            "class": "array:file",
            "optional": true,
            "label": "Mappings",
            "type": "bam",
        }))
        .expect("decode");
        assert_eq!(p.name, "mappings");
        assert!(p.class.array);
        assert_eq!(p.display_name(), "Mappings");
        assert!(!p.is_required());
    }
}
