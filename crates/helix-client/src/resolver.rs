//! Platform path resolution.
//!
//! Users name objects as `project:/folder/name`, `/folder/name` (project
//! context implied), a bare name (working directory implied), or a naked
//! hash ID, optionally project-qualified (`project-xxxx:file-yyyy`).
//! Separators inside names are escaped with a backslash.
//!
//! Parsing is pure and never touches the network; [`ApiClient::resolve_existing`]
//! turns a parsed path into a concrete object via describe/find calls.

use serde_json::{json, Value};
use tracing::debug;

use helix_proto::{is_hash_id, is_project_id};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::search::{FindDataObjectsQuery, FindProjectsQuery};

/// Split `s` on every unescaped `sep`, unescaping the resulting parts.
///
/// Always returns one more part than there are unescaped separators.
#[must_use]
pub fn split_unescaped(sep: char, s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            }
        } else if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

/// Split `s` at the first unescaped `sep`, leaving escapes in both halves.
#[must_use]
pub fn split_once_unescaped(sep: char, s: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            return Some((&s[..i], &s[i + c.len_utf8()..]));
        }
    }
    None
}

/// Remove backslash escapes from `s`.
#[must_use]
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn contains_unescaped(sep: char, s: &str) -> bool {
    split_once_unescaped(sep, s).is_some()
}

/// The syntactic form of a platform path, before any network resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    /// A hash ID, optionally project-qualified.
    Id {
        /// Project qualifier (ID or name), when given.
        project: Option<String>,
        /// The object's hash ID.
        id: String,
    },
    /// A folder path, optionally ending in an object name.
    Path {
        /// Project part (ID or name), when given. `None` means the project
        /// context applies.
        project: Option<String>,
        /// Normalized absolute folder.
        folder: String,
        /// Trailing object name; `None` for folder-only paths.
        name: Option<String>,
    },
}

impl ParsedPath {
    /// Parse a path string. Relative paths are joined onto `wd`.
    ///
    /// # Errors
    ///
    /// Returns an error for empty paths and paths with more than one
    /// unescaped colon.
    pub fn parse(s: &str, wd: &str) -> Result<Self, ClientError> {
        if s.is_empty() {
            return Err(ClientError::InvalidPath("empty path".to_string()));
        }

        let (project_part, path_part, had_colon) = match split_once_unescaped(':', s) {
            Some((project, rest)) => {
                if contains_unescaped(':', rest) {
                    return Err(ClientError::InvalidPath(format!(
                        "at most one colon is allowed: {s}"
                    )));
                }
                let project = if project.is_empty() {
                    None
                } else {
                    Some(unescape(project))
                };
                (project, rest, true)
            }
            None => (None, s, false),
        };

        let unescaped_path = unescape(path_part);
        if is_hash_id(&unescaped_path) {
            return Ok(Self::Id {
                project: project_part,
                id: unescaped_path,
            });
        }

        let absolute = path_part.starts_with('/');
        let trailing_slash = path_part.ends_with('/') && !path_part.ends_with("\\/");

        let mut segments: Vec<String> = split_unescaped('/', path_part)
            .into_iter()
            .filter(|seg| !seg.is_empty())
            .collect();

        let name = if trailing_slash || segments.is_empty() {
            None
        } else {
            segments.pop()
        };

        // A colon pins the path to the named project's root; the working
        // directory only applies to paths inside the context project.
        let mut folder_parts: Vec<String> = if absolute || had_colon {
            Vec::new()
        } else {
            wd.split('/').filter(|p| !p.is_empty()).map(String::from).collect()
        };
        for seg in segments {
            match seg.as_str() {
                "." => {}
                ".." => {
                    folder_parts.pop();
                }
                _ => folder_parts.push(seg),
            }
        }
        let folder = format!("/{}", folder_parts.join("/"));

        Ok(Self::Path {
            project: project_part,
            folder,
            name,
        })
    }
}

/// A path resolved to a concrete platform object.
#[derive(Debug, Clone)]
pub struct ResolvedObject {
    /// The object's ID.
    pub id: String,
    /// The project it was found in, when known.
    pub project: Option<String>,
    /// The object's describe output.
    pub describe: Value,
}

impl ResolvedObject {
    /// The object's class, read from its describe output.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.describe.get("class").and_then(Value::as_str)
    }
}

/// The outcome of resolving a path.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The path named a single object.
    Object(ResolvedObject),
    /// The path named a folder, with no trailing entity.
    Folder {
        /// The containing project's ID.
        project: String,
        /// The folder path.
        folder: String,
    },
}

impl Resolution {
    /// Unwrap an object resolution.
    ///
    /// # Errors
    ///
    /// Returns an error when the path resolved to a folder.
    pub fn into_object(self, path: &str) -> Result<ResolvedObject, ClientError> {
        match self {
            Self::Object(object) => Ok(object),
            Self::Folder { .. } => Err(ClientError::NotFound(path.to_string())),
        }
    }
}

impl ApiClient {
    /// Resolve a path string to an existing object or folder.
    ///
    /// Hash IDs go straight through describe; names go through
    /// `findDataObjects` scoped to the resolved project and folder. A
    /// syntactically invalid path never issues a network call.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid paths, missing project context on
    /// relative paths, zero matches, or multiple matches.
    pub async fn resolve_existing(&self, path: &str) -> Result<Resolution, ClientError> {
        let parsed = ParsedPath::parse(path, &self.config().cli_wd)?;
        debug!(path = %path, parsed = ?parsed, "resolving path");
        match parsed {
            ParsedPath::Id { project: None, id } => {
                let describe = self.describe(&id).await?;
                Ok(Resolution::Object(object_from_describe(id, describe)))
            }
            ParsedPath::Id {
                project: Some(project),
                id,
            } => {
                let project = self.resolve_project(&project).await?;
                let describe = self
                    .describe_with(&id, &json!({ "project": project }))
                    .await?;
                Ok(Resolution::Object(object_from_describe(id, describe)))
            }
            ParsedPath::Path {
                project,
                folder,
                name,
            } => {
                let project = match project {
                    Some(spec) => self.resolve_project(&spec).await?,
                    None => self.config().project_context_or_err()?.to_string(),
                };
                match name {
                    None => Ok(Resolution::Folder { project, folder }),
                    Some(name) => self.resolve_name(path, &project, &folder, &name).await,
                }
            }
        }
    }

    /// Resolve a project spec (ID or name) to a project ID.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown or ambiguous project names.
    pub async fn resolve_project(&self, spec: &str) -> Result<String, ClientError> {
        if is_project_id(spec) {
            return Ok(spec.to_string());
        }
        let results = self
            .find_projects(&FindProjectsQuery {
                name: Some(spec.to_string()),
                level: Some("VIEW".to_string()),
                describe: false,
            })
            .await?;
        if results.len() > 1 {
            return Err(ClientError::Ambiguous(spec.to_string()));
        }
        results
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| ClientError::NotFound(spec.to_string()))
    }

    async fn resolve_name(
        &self,
        path: &str,
        project: &str,
        folder: &str,
        name: &str,
    ) -> Result<Resolution, ClientError> {
        let results = self
            .find_data_objects(&FindDataObjectsQuery {
                name: Some(name.to_string()),
                project: Some(project.to_string()),
                folder: Some(folder.to_string()),
                describe: true,
                limit: Some(2),
                ..Default::default()
            })
            .await?;
        if results.len() > 1 {
            return Err(ClientError::Ambiguous(path.to_string()));
        }
        let result = results
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(path.to_string()))?;
        Ok(Resolution::Object(ResolvedObject {
            id: result.id,
            project: result.project.or_else(|| Some(project.to_string())),
            describe: result.describe.unwrap_or(Value::Null),
        }))
    }
}

fn object_from_describe(id: String, describe: Value) -> ResolvedObject {
    let project = describe
        .get("project")
        .and_then(Value::as_str)
        .map(String::from);
    ResolvedObject {
        id,
        project,
        describe,
    }
}
