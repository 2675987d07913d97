//! Run-call payloads and job describe shapes.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The payload for an applet or app run call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Name for the resulting job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The job input hash.
    pub input: Map<String, Value>,
    /// Destination project for the job and its outputs.
    pub project: String,
    /// Destination folder inside the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl RunRequest {
    /// Create a run request for a project with the given input hash.
    #[must_use]
    pub fn new(project: impl Into<String>, input: Map<String, Value>) -> Self {
        Self {
            name: None,
            input,
            project: project.into(),
            folder: None,
        }
    }

    /// Set the job name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The response of a run call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    /// The launched job's ID.
    pub id: String,
}

/// Job lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Queued, not yet eligible to run.
    Idle,
    /// Waiting for inputs to close.
    WaitingOnInput,
    /// Eligible to run.
    Runnable,
    /// Executing.
    Running,
    /// Waiting for output objects to close.
    WaitingOnOutput,
    /// Finished successfully.
    Done,
    /// Finished with an error.
    Failed,
    /// Termination requested.
    Terminating,
    /// Terminated by a user.
    Terminated,
    /// The worker stopped responding.
    Unresponsive,
}

impl JobState {
    /// Whether the state is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Terminated)
    }

    /// Whether the state is a terminal failure.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Terminated)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::WaitingOnInput => "waiting_on_input",
            Self::Runnable => "runnable",
            Self::Running => "running",
            Self::WaitingOnOutput => "waiting_on_output",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Terminating => "terminating",
            Self::Terminated => "terminated",
            Self::Unresponsive => "unresponsive",
        };
        f.write_str(s)
    }
}

/// The subset of a job describe the toolkit consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescribe {
    /// Job ID.
    pub id: String,
    /// Job name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current state.
    pub state: JobState,
    /// Project the job runs in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Output hash, present once the job is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,
    /// Creation time, milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

impl JobDescribe {
    /// Creation time as a UTC timestamp, when the platform sent one.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// The platform API error envelope: `{"error": {"type": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error payload.
    pub error: ErrorDetail,
}

/// The inner error record of an [`ErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error type, e.g. `ResourceNotFound` or `InvalidInput`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}
