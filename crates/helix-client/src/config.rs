//! Client configuration from the environment.
//!
//! The toolkit is configured entirely through environment variables set by
//! the login flow:
//!
//! - `HELIX_API_TOKEN` — bearer token (required)
//! - `HELIX_APISERVER_URL` — apiserver base URL (defaults to production)
//! - `HELIX_PROJECT_CONTEXT` — current project for relative paths and runs
//! - `HELIX_CLI_WD` — current working directory inside the project

use std::env;

use crate::error::ClientError;

/// Default apiserver base URL.
pub const DEFAULT_APISERVER_URL: &str = "https://api.helix.bio";

/// Environment variable holding the bearer token.
pub const TOKEN_VAR: &str = "HELIX_API_TOKEN";
/// Environment variable overriding the apiserver URL.
pub const APISERVER_VAR: &str = "HELIX_APISERVER_URL";
/// Environment variable holding the current project context.
pub const PROJECT_VAR: &str = "HELIX_PROJECT_CONTEXT";
/// Environment variable holding the in-project working directory.
pub const WD_VAR: &str = "HELIX_CLI_WD";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Apiserver base URL, no trailing slash.
    pub apiserver_url: String,
    /// Bearer token passed through on every call.
    pub token: String,
    /// Current project context, when one is selected.
    pub project_context: Option<String>,
    /// Working directory inside the project context.
    pub cli_wd: String,
}

impl ApiConfig {
    /// Build a config from explicit values.
    #[must_use]
    pub fn new(apiserver_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut url: String = apiserver_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            apiserver_url: url,
            token: token.into(),
            project_context: None,
            cli_wd: "/".to_string(),
        }
    }

    /// Set the project context.
    #[must_use]
    pub fn with_project_context(mut self, project: impl Into<String>) -> Self {
        self.project_context = Some(project.into());
        self
    }

    /// Set the in-project working directory.
    #[must_use]
    pub fn with_cli_wd(mut self, wd: impl Into<String>) -> Self {
        self.cli_wd = wd.into();
        self
    }

    /// Read the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a config error when no token is set — surfaced here rather
    /// than on the first API call.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_vars(
            env::var(APISERVER_VAR).ok(),
            env::var(TOKEN_VAR).ok(),
            env::var(PROJECT_VAR).ok(),
            env::var(WD_VAR).ok(),
        )
    }

    fn from_vars(
        apiserver_url: Option<String>,
        token: Option<String>,
        project_context: Option<String>,
        cli_wd: Option<String>,
    ) -> Result<Self, ClientError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Config(format!("{TOKEN_VAR} is not set; log in first")))?;
        let mut config = Self::new(
            apiserver_url.unwrap_or_else(|| DEFAULT_APISERVER_URL.to_string()),
            token,
        );
        config.project_context = project_context.filter(|p| !p.is_empty());
        if let Some(wd) = cli_wd.filter(|w| !w.is_empty()) {
            config.cli_wd = wd;
        }
        Ok(config)
    }

    /// The project context, or a config error naming the fix.
    ///
    /// # Errors
    ///
    /// Returns a config error when no project is selected.
    pub fn project_context_or_err(&self) -> Result<&str, ClientError> {
        self.project_context.as_deref().ok_or_else(|| {
            ClientError::Config(format!(
                "no project context; set {PROJECT_VAR} or select a project"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_a_config_error() {
        let result = ApiConfig::from_vars(None, None, None, None);
        assert!(matches!(result, Err(ClientError::Config(_))));

        let result = ApiConfig::from_vars(None, Some(String::new()), None, None);
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn defaults_applied() {
        let config = ApiConfig::from_vars(None, Some("tok".into()), None, None).expect("config");
        assert_eq!(config.apiserver_url, DEFAULT_APISERVER_URL);
        assert_eq!(config.cli_wd, "/");
        assert!(config.project_context.is_none());
    }

    #[test]
    fn overrides_applied_and_url_trimmed() {
        let config = ApiConfig::from_vars(
            Some("https://staging.helix.bio/".into()),
            Some("tok".into()),
            Some("project-A1b2C3d4E5f6G7h8J9k0L1m2".into()),
            Some("/work".into()),
        )
        .expect("config");
        assert_eq!(config.apiserver_url, "https://staging.helix.bio");
        assert_eq!(config.cli_wd, "/work");
        assert_eq!(
            config.project_context_or_err().expect("context"),
            "project-A1b2C3d4E5f6G7h8J9k0L1m2"
        );
    }

    #[test]
    fn project_context_error_names_variable() {
        let config = ApiConfig::new(DEFAULT_APISERVER_URL, "tok");
        let err = config.project_context_or_err().expect_err("no context");
        assert!(err.to_string().contains(PROJECT_VAR));
    }
}
