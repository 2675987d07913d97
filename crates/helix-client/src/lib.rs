//! # helix-client
//!
//! HTTP client for the Helix platform API.
//!
//! The platform exposes one calling convention: POST a JSON payload to
//! `https://<apiserver>/<route>` with a bearer token, get JSON back. This
//! crate wraps that convention in [`ApiClient`], layers typed describe /
//! find / run / job-poll helpers on top, and implements the path resolver
//! that turns `project:/folder/name` strings into concrete object IDs.
//!
//! ```text
//! ┌───────────┐      POST JSON + token      ┌──────────────────┐
//! │ ApiClient │◄───────────────────────────►│  Helix apiserver │
//! └───────────┘                             └──────────────────┘
//! ```
//!
//! No retries, caching, or session state: every call is a single
//! request/response exchange.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod resolver;
pub mod search;

pub use api::ApiClient;
pub use config::ApiConfig;
pub use error::ClientError;
pub use resolver::{split_unescaped, ParsedPath, Resolution, ResolvedObject};
pub use search::{FindDataObjectsQuery, FindJobsQuery, FindProjectsQuery, FindResult};
