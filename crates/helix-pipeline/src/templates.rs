//! Applet descriptor and launcher script generation.

use serde::Serialize;
use serde_json::json;

use helix_proto::{BaseClass, InputClass, InputParam};

/// The generated applet descriptor (`applet.json`).
#[derive(Debug, Clone, Serialize)]
pub struct AppletDescriptor {
    /// Applet name.
    pub name: String,
    /// Human-facing title.
    pub title: String,
    /// One-line summary.
    pub summary: String,
    /// Execution details.
    #[serde(rename = "runSpec")]
    pub run_spec: RunSpec,
    /// Input parameters: the fixed run params plus the pipeline's own.
    #[serde(rename = "inputSpec")]
    pub input_spec: Vec<InputParam>,
    /// Output parameters.
    #[serde(rename = "outputSpec")]
    pub output_spec: Vec<InputParam>,
}

/// The runSpec section of a descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct RunSpec {
    /// Interpreter for the entry point.
    pub interpreter: String,
    /// Entry point path inside the applet resources.
    pub file: String,
    /// Base distribution of the execution environment.
    pub distribution: String,
    /// Distribution release.
    pub release: String,
}

/// The seven run parameters every generated pipeline applet carries.
#[must_use]
pub fn default_run_params() -> Vec<InputParam> {
    vec![
        InputParam::new("nextflow_run_opts", InputClass::scalar(BaseClass::String))
            .optional()
            .with_help("Additional run arguments for nextflow (e.g. -queue-size 5)."),
        InputParam::new(
            "nextflow_top_level_opts",
            InputClass::scalar(BaseClass::String),
        )
        .optional()
        .with_help("Additional top-level options for nextflow (e.g. -quiet)."),
        InputParam::new(
            "nextflow_pipeline_params",
            InputClass::scalar(BaseClass::String),
        )
        .optional()
        .with_help(
            "Additional pipeline parameters for nextflow, preceded with double dashes \
             (e.g. --foo bar).",
        ),
        InputParam::new("docker_creds", InputClass::scalar(BaseClass::File))
            .optional()
            .with_help("Docker credentials used to obtain private docker images."),
        InputParam::new("debug", InputClass::scalar(BaseClass::Boolean))
            .with_default(json!(false))
            .with_help("Shows additional information in the job log."),
        InputParam::new("resume", InputClass::scalar(BaseClass::String))
            .optional()
            .with_help("Unique ID of the previous session to be resumed."),
        InputParam::new("preserve_cache", InputClass::scalar(BaseClass::Boolean))
            .with_default(json!(false))
            .with_help(
                "Store the pipeline cache and local working files to the current project.",
            ),
    ]
}

/// Build the descriptor for a generated pipeline applet.
///
/// `pipeline_inputs` are the schema-derived parameters; they are appended
/// after the fixed run params.
#[must_use]
pub fn descriptor(name: &str, pipeline_inputs: &[InputParam]) -> AppletDescriptor {
    let mut input_spec = default_run_params();
    input_spec.extend(pipeline_inputs.iter().cloned());

    let published = InputParam::new("published_files", InputClass::array(BaseClass::File))
        .optional()
        .with_help("Files published by the pipeline's publishDir directives.");

    AppletDescriptor {
        name: name.to_string(),
        title: name.to_string(),
        summary: format!("Nextflow pipeline {name}"),
        run_spec: RunSpec {
            interpreter: "bash".to_string(),
            file: "src/nextflow.sh".to_string(),
            distribution: "Ubuntu".to_string(),
            release: "24.04".to_string(),
        },
        input_spec,
        output_spec: vec![published],
    }
}

/// Render the launcher script for a generated pipeline applet.
///
/// The script forwards every set pipeline parameter as `--name value` and
/// applies the configuration profile when one was chosen at build time.
#[must_use]
pub fn launcher_script(pipeline_inputs: &[InputParam], profile: Option<&str>) -> String {
    let mut script = String::new();
    script.push_str("#!/usr/bin/env bash\n");
    script.push_str("# Launcher for a Helix-built Nextflow pipeline.\n");
    script.push_str("set -e -o pipefail\n\n");
    script.push_str("main() {\n");
    script.push_str("    if [ \"${debug:-false}\" = \"true\" ]; then\n");
    script.push_str("        set -x\n");
    script.push_str("        export NXF_DEBUG=2\n");
    script.push_str("    fi\n\n");
    script.push_str("    RUN_ARGS=\"${nextflow_run_opts:-}\"\n");
    script.push_str("    if [ -n \"${resume:-}\" ]; then\n");
    script.push_str("        RUN_ARGS=\"$RUN_ARGS -resume ${resume}\"\n");
    script.push_str("    fi\n\n");
    script.push_str("    PIPELINE_ARGS=\"\"\n");
    for param in pipeline_inputs {
        let name = &param.name;
        script.push_str(&format!("    if [ -n \"${{{name}:-}}\" ]; then\n"));
        script.push_str(&format!(
            "        PIPELINE_ARGS=\"$PIPELINE_ARGS --{name} ${name}\"\n"
        ));
        script.push_str("    fi\n");
    }
    let profile_arg = profile
        .map(|p| format!(" -profile {p}"))
        .unwrap_or_default();
    script.push_str(&format!(
        "\n    nextflow ${{nextflow_top_level_opts:-}} run /home/helix/pipeline{profile_arg} \\\n"
    ));
    script.push_str("        $RUN_ARGS $PIPELINE_ARGS ${nextflow_pipeline_params:-}\n");
    script.push_str("}\n");
    script
}
