//! Pipeline build orchestration.
//!
//! [`prepare`] generates the build directory for a local pipeline;
//! [`import_from_repository`] runs the platform's pipeline importer app
//! against a git repository and waits for the applet it produces.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use helix_client::resolver::split_once_unescaped;
use helix_client::ApiClient;
use helix_proto::{is_hash_id, is_project_id, ObjectLink, RunRequest};

use crate::error::PipelineError;
use crate::schema::inputs_from_schema_file;
use crate::templates::{descriptor, launcher_script};

/// The platform app that builds pipeline applets from git repositories.
pub const IMPORTER_APP: &str = "app-nextflow_pipeline_importer";

/// Name of the build directory created inside the resources directory.
pub const BUILD_DIR_NAME: &str = ".helix.nextflow";

/// Options for a remote pipeline import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Git repository URL.
    pub repository: String,
    /// Tag or branch; the repository default branch when absent.
    pub tag: Option<String>,
    /// Nextflow configuration profile.
    pub profile: Option<String>,
    /// File holding GitHub credentials, as an ID or `project:id` pair.
    pub github_credentials: Option<String>,
}

impl ImportOptions {
    /// Options for importing `repository` at its default branch.
    #[must_use]
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: None,
            profile: None,
            github_credentials: None,
        }
    }
}

/// The result of a remote import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The importer job that ran the build.
    pub job_id: String,
    /// The applet the build produced.
    pub applet_id: String,
}

/// Generate the applet build directory for a local pipeline.
///
/// Reads `nextflow_schema.json` when present, then writes `applet.json`
/// and `src/nextflow.sh` under [`BUILD_DIR_NAME`] inside the resources
/// directory. Returns the build directory path.
///
/// # Errors
///
/// Returns an error if the resources directory does not exist, the schema
/// is invalid, or the build files cannot be written.
pub fn prepare(resources_dir: &Path, profile: Option<&str>) -> Result<PathBuf, PipelineError> {
    if !resources_dir.is_dir() {
        return Err(PipelineError::MissingResources(
            resources_dir.display().to_string(),
        ));
    }

    let schema_path = resources_dir.join("nextflow_schema.json");
    let pipeline_inputs = if schema_path.exists() {
        inputs_from_schema_file(&schema_path)?
    } else {
        Vec::new()
    };
    debug!(
        inputs = pipeline_inputs.len(),
        "converted pipeline schema inputs"
    );

    let name = resources_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("nextflow-pipeline");

    let build_dir = resources_dir.join(BUILD_DIR_NAME);
    fs::create_dir_all(build_dir.join("src"))?;

    let applet = descriptor(name, &pipeline_inputs);
    let encoded = serde_json::to_string_pretty(&applet)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    fs::write(build_dir.join("applet.json"), encoded)?;
    fs::write(
        build_dir.join("src/nextflow.sh"),
        launcher_script(&pipeline_inputs, profile),
    )?;

    info!(dir = %build_dir.display(), "prepared pipeline build directory");
    Ok(build_dir)
}

/// Run the pipeline importer app and wait for the applet it builds.
///
/// # Errors
///
/// Returns an error when no project context is selected, the credentials
/// reference is malformed, the importer job fails, or its output carries no
/// applet link.
pub async fn import_from_repository(
    client: &ApiClient,
    options: &ImportOptions,
) -> Result<ImportOutcome, PipelineError> {
    let project = client
        .config()
        .project_context
        .clone()
        .ok_or(PipelineError::NoDestinationProject)?;

    let mut input = Map::new();
    input.insert("repository_url".into(), json!(options.repository));
    if let Some(tag) = &options.tag {
        input.insert("repository_tag".into(), json!(tag));
    }
    if let Some(profile) = &options.profile {
        input.insert("config_profile".into(), json!(profile));
    }
    if let Some(creds) = &options.github_credentials {
        input.insert("github_credentials".into(), credentials_link(creds)?);
    }

    let request = RunRequest::new(project, input)
        .with_name(format!("Nextflow build of {}", options.repository));
    let response = client.run_app(IMPORTER_APP, &request).await?;
    info!(job = %response.id, "started pipeline importer job");

    let describe = client
        .wait_on_done(&response.id, Duration::from_secs(1))
        .await?;
    let applet_id = describe
        .output
        .as_ref()
        .and_then(|output| output.get("output_applet"))
        .and_then(ObjectLink::from_value)
        .map(|link| link.id().to_string())
        .ok_or_else(|| PipelineError::MissingOutput(describe.id.clone()))?;

    info!(applet = %applet_id, "pipeline applet created");
    Ok(ImportOutcome {
        job_id: describe.id,
        applet_id,
    })
}

// Credentials may arrive as a bare file ID or as project:file-id; anything
// else cannot be turned into a link.
fn credentials_link(spec: &str) -> Result<Value, PipelineError> {
    if is_hash_id(spec) {
        return Ok(ObjectLink::bare(spec).into_value());
    }
    if let Some((project, id)) = split_once_unescaped(':', spec) {
        if is_project_id(project) && is_hash_id(id) {
            return Ok(ObjectLink::qualified(project, id).into_value());
        }
    }
    Err(PipelineError::InvalidCredentials(spec.to_string()))
}
