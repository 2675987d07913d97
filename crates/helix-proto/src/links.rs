//! Object links and job output references.
//!
//! A link is how one platform object points at another inside a JSON
//! payload: `{"$helix_link": "file-xxxx"}`, or the project-qualified form
//! `{"$helix_link": {"project": "project-xxxx", "id": "file-xxxx"}}`. A job
//! output reference stands in for a value that a still-running job will
//! produce: `{"job": "job-xxxx", "field": "out_name"}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A `$helix_link` pointing at a platform object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLink {
    #[serde(rename = "$helix_link")]
    target: LinkTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum LinkTarget {
    Id(String),
    Qualified { project: String, id: String },
}

impl ObjectLink {
    /// A bare link to an object by ID.
    #[must_use]
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            target: LinkTarget::Id(id.into()),
        }
    }

    /// A project-qualified link.
    #[must_use]
    pub fn qualified(project: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            target: LinkTarget::Qualified {
                project: project.into(),
                id: id.into(),
            },
        }
    }

    /// The linked object ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match &self.target {
            LinkTarget::Id(id) | LinkTarget::Qualified { id, .. } => id,
        }
    }

    /// The qualifying project, if any.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        match &self.target {
            LinkTarget::Id(_) => None,
            LinkTarget::Qualified { project, .. } => Some(project),
        }
    }

    /// Convert the link into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self.target {
            LinkTarget::Id(id) => json!({ "$helix_link": id }),
            LinkTarget::Qualified { project, id } => {
                json!({ "$helix_link": { "project": project, "id": id } })
            }
        }
    }

    /// Try to read a link out of a JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_link(value) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Returns true if `value` is shaped like an object link.
#[must_use]
pub fn is_link(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|m| m.len() == 1 && m.contains_key("$helix_link"))
}

/// A reference to a (possibly not yet produced) output field of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutputRef {
    /// The job that will produce the value.
    pub job: String,
    /// The output field name.
    pub field: String,
}

impl JobOutputRef {
    /// Create a job output reference.
    #[must_use]
    pub fn new(job: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            field: field.into(),
        }
    }

    /// Convert the reference into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        json!({ "job": self.job, "field": self.field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_link_serializes_flat() {
        let link = ObjectLink::bare("file-B5QF8pQ04QJzx0xKzZ8rTkYv");
        assert_eq!(
            link.into_value(),
            json!({ "$helix_link": "file-B5QF8pQ04QJzx0xKzZ8rTkYv" })
        );
    }

    #[test]
    fn qualified_link_carries_project() {
        let link = ObjectLink::qualified(
            "project-A1b2C3d4E5f6G7h8J9k0L1m2",
            "file-B5QF8pQ04QJzx0xKzZ8rTkYv",
        );
        assert_eq!(link.project(), Some("project-A1b2C3d4E5f6G7h8J9k0L1m2"));
        assert_eq!(link.id(), "file-B5QF8pQ04QJzx0xKzZ8rTkYv");
        assert_eq!(
            link.into_value(),
            json!({ "$helix_link": {
                "project": "project-A1b2C3d4E5f6G7h8J9k0L1m2",
                "id": "file-B5QF8pQ04QJzx0xKzZ8rTkYv",
            }})
        );
    }

    #[test]
    fn link_round_trips_through_value() {
        let value = json!({ "$helix_link": "record-A1b2C3d4E5f6G7h8J9k0L1m2" });
        let link = ObjectLink::from_value(&value).expect("is a link");
        assert_eq!(link.id(), "record-A1b2C3d4E5f6G7h8J9k0L1m2");
        assert_eq!(link.into_value(), value);
    }

    #[test]
    fn is_link_rejects_other_shapes() {
        assert!(!is_link(&json!("file-xxxx")));
        assert!(!is_link(&json!({ "job": "job-x", "field": "y" })));
        assert!(!is_link(&json!({ "$helix_link": "x", "extra": 1 })));
    }

    #[test]
    fn job_output_ref_value_shape() {
        let jor = JobOutputRef::new("job-A1b2C3d4E5f6G7h8J9k0L1m2", "reads");
        assert_eq!(
            jor.into_value(),
            json!({ "job": "job-A1b2C3d4E5f6G7h8J9k0L1m2", "field": "reads" })
        );
    }
}
