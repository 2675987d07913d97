//! # helix-proto
//!
//! Object model and API payload types for the Helix platform.
//!
//! Everything the platform understands on the wire lives here: class-prefixed
//! object IDs, `$helix_link` object links, job output references, executable
//! input specs, and the run-call request/response shapes. The types are plain
//! serde data — no I/O happens in this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod ids;
pub mod inputs;
pub mod links;
pub mod run;

pub use error::ProtoError;
pub use ids::{is_app_ref, is_data_object_id, is_hash_id, is_job_id, is_project_id, ObjectId};
pub use inputs::{BaseClass, InputClass, InputParam};
pub use links::{JobOutputRef, ObjectLink};
pub use run::{ErrorBody, JobDescribe, JobState, RunRequest, RunResponse};
