//! Class-prefixed platform object IDs.
//!
//! Every object on the platform carries an ID of the form
//! `<class>-<24 base-62 characters>`, e.g. `file-B5QF8pQ04QJzx0xKzZ8rTkYv`.
//! Apps are the exception: they are addressed by name as `app-<name>`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ProtoError;

static HASH_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(file|record|applet|database|project|container|job)-[0-9A-Za-z]{24}$")
        .expect("hash ID pattern")
});

static APP_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^app-[a-zA-Z0-9._-]+(/[a-zA-Z0-9._-]+)?$").expect("app ref pattern"));

/// Returns true if `s` is a well-formed class-prefixed hash ID of any class.
#[must_use]
pub fn is_hash_id(s: &str) -> bool {
    HASH_ID_RE.is_match(s)
}

/// Returns true if `s` is a job ID.
#[must_use]
pub fn is_job_id(s: &str) -> bool {
    s.starts_with("job-") && is_hash_id(s)
}

/// Returns true if `s` is a project ID.
#[must_use]
pub fn is_project_id(s: &str) -> bool {
    s.starts_with("project-") && is_hash_id(s)
}

/// Returns true if `s` is a data object ID (file, record, applet, database).
#[must_use]
pub fn is_data_object_id(s: &str) -> bool {
    is_hash_id(s)
        && ["file-", "record-", "applet-", "database-"]
            .iter()
            .any(|p| s.starts_with(p))
}

/// Returns true if `s` is an app reference (`app-<name>` or `app-<name>/<tag>`).
///
/// App names that happen to look like 24-character hashes are still app refs;
/// the platform resolves them by name either way.
#[must_use]
pub fn is_app_ref(s: &str) -> bool {
    APP_REF_RE.is_match(s)
}

/// A validated, class-prefixed platform object ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse an `ObjectId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `<known class>-<24 base62>`.
    pub fn parse(s: &str) -> Result<Self, ProtoError> {
        if is_hash_id(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ProtoError::Validation(format!("invalid object ID: {s}")))
        }
    }

    /// The class prefix, e.g. `"file"` for `file-xxxx`.
    #[must_use]
    pub fn class(&self) -> &str {
        self.0.split_once('-').map_or("", |(class, _)| class)
    }

    /// The full ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ProtoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
