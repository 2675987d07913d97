//! System search routes: findDataObjects, findProjects, findJobs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::error::ClientError;

/// Query for `system/findDataObjects`.
#[derive(Debug, Clone, Default)]
pub struct FindDataObjectsQuery {
    /// Restrict to a single data class (`file`, `record`, ...).
    pub class: Option<String>,
    /// Exact object name to match.
    pub name: Option<String>,
    /// Project scope.
    pub project: Option<String>,
    /// Folder scope inside the project.
    pub folder: Option<String>,
    /// Type constraint on matched objects.
    pub type_spec: Option<String>,
    /// Whether to include describe output per result.
    pub describe: bool,
    /// Cap on returned results.
    pub limit: Option<u32>,
}

impl FindDataObjectsQuery {
    pub(crate) fn to_payload(&self) -> Value {
        let mut payload = serde_json::Map::new();
        if let Some(class) = &self.class {
            payload.insert("class".into(), json!(class));
        }
        if let Some(name) = &self.name {
            payload.insert("name".into(), json!(name));
        }
        if let Some(type_spec) = &self.type_spec {
            payload.insert("type".into(), json!(type_spec));
        }
        if let Some(project) = &self.project {
            let mut scope = serde_json::Map::new();
            scope.insert("project".into(), json!(project));
            if let Some(folder) = &self.folder {
                scope.insert("folder".into(), json!(folder));
            }
            payload.insert("scope".into(), Value::Object(scope));
        }
        if self.describe {
            payload.insert("describe".into(), json!(true));
        }
        if let Some(limit) = self.limit {
            payload.insert("limit".into(), json!(limit));
        }
        Value::Object(payload)
    }
}

/// Query for `system/findProjects`.
#[derive(Debug, Clone, Default)]
pub struct FindProjectsQuery {
    /// Exact project name to match.
    pub name: Option<String>,
    /// Minimum permission level, e.g. `VIEW`.
    pub level: Option<String>,
    /// Whether to include describe output per result.
    pub describe: bool,
}

impl FindProjectsQuery {
    pub(crate) fn to_payload(&self) -> Value {
        let mut payload = serde_json::Map::new();
        if let Some(name) = &self.name {
            payload.insert("name".into(), json!(name));
        }
        if let Some(level) = &self.level {
            payload.insert("level".into(), json!(level));
        }
        if self.describe {
            payload.insert("describe".into(), json!(true));
        }
        Value::Object(payload)
    }
}

/// Query for `system/findJobs`.
#[derive(Debug, Clone, Default)]
pub struct FindJobsQuery {
    /// Restrict to jobs in a project.
    pub project: Option<String>,
    /// Restrict to top-level jobs (no parent).
    pub top_level_only: bool,
    /// Whether to include describe output per result.
    pub describe: bool,
}

impl FindJobsQuery {
    pub(crate) fn to_payload(&self) -> Value {
        let mut payload = serde_json::Map::new();
        if let Some(project) = &self.project {
            payload.insert("project".into(), json!(project));
        }
        if self.top_level_only {
            payload.insert("parentJob".into(), Value::Null);
        }
        if self.describe {
            payload.insert("describe".into(), json!(true));
        }
        Value::Object(payload)
    }
}

/// One search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindResult {
    /// Matched object ID.
    pub id: String,
    /// Project the match lives in, when the route reports one.
    #[serde(default)]
    pub project: Option<String>,
    /// Describe output, when requested.
    #[serde(default)]
    pub describe: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    results: Vec<FindResult>,
}

impl ApiClient {
    /// Search data objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response is malformed.
    pub async fn find_data_objects(
        &self,
        query: &FindDataObjectsQuery,
    ) -> Result<Vec<FindResult>, ClientError> {
        self.find("system/findDataObjects", &query.to_payload()).await
    }

    /// Search projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response is malformed.
    pub async fn find_projects(
        &self,
        query: &FindProjectsQuery,
    ) -> Result<Vec<FindResult>, ClientError> {
        self.find("system/findProjects", &query.to_payload()).await
    }

    /// Search jobs.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response is malformed.
    pub async fn find_jobs(&self, query: &FindJobsQuery) -> Result<Vec<FindResult>, ClientError> {
        self.find("system/findJobs", &query.to_payload()).await
    }

    async fn find(&self, route: &str, payload: &Value) -> Result<Vec<FindResult>, ClientError> {
        let body = self.call(route, payload).await?;
        let response: FindResponse = serde_json::from_value(body)
            .map_err(|e| ClientError::UnexpectedResponse(format!("malformed find response: {e}")))?;
        Ok(response.results)
    }
}
