//! The apiserver client.
//!
//! Every platform call is `POST {base}/{route}` with a JSON payload and a
//! bearer token. [`ApiClient::call`] is that single primitive; the typed
//! methods below are thin wrappers that pick the route and decode the
//! response.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, trace};

use helix_proto::{ErrorBody, JobDescribe, RunRequest, RunResponse};

use crate::config::ApiConfig;
use crate::error::ClientError;

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Helix apiserver.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("apiserver_url", &self.config.apiserver_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Create a client from the environment.
    ///
    /// # Errors
    ///
    /// Returns a config error when no token is set.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ApiConfig::from_env()?)
    }

    /// The client's configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST `payload` to `route` and return the JSON response.
    ///
    /// Non-2xx responses carrying the platform error envelope become
    /// [`ClientError::Api`]; anything else non-2xx is an unexpected
    /// response. No retries.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or any non-2xx response.
    pub async fn call(&self, route: &str, payload: &Value) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.config.apiserver_url, route.trim_start_matches('/'));
        debug!(route = %route, "apiserver call");
        trace!(payload = %payload, "request payload");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid JSON response: {e}")))?;

        if status.is_success() {
            return Ok(body);
        }
        if let Ok(envelope) = serde_json::from_value::<ErrorBody>(body.clone()) {
            return Err(ClientError::Api {
                kind: envelope.error.kind,
                message: envelope.error.message,
            });
        }
        Err(ClientError::UnexpectedResponse(format!(
            "HTTP {status}: {body}"
        )))
    }

    /// Describe an object by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn describe(&self, id: &str) -> Result<Value, ClientError> {
        self.call(&format!("{id}/describe"), &json!({})).await
    }

    /// Describe an object by ID with describe options (field selection,
    /// project scope).
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn describe_with(&self, id: &str, options: &Value) -> Result<Value, ClientError> {
        self.call(&format!("{id}/describe"), options).await
    }

    /// Run an app by name. Accepts either `app-<name>` or the bare name.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn run_app(&self, app: &str, request: &RunRequest) -> Result<RunResponse, ClientError> {
        let route = if app.starts_with("app-") {
            format!("{app}/run")
        } else {
            format!("app-{app}/run")
        };
        self.run(&route, request).await
    }

    /// Run an applet by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub async fn run_applet(
        &self,
        applet_id: &str,
        request: &RunRequest,
    ) -> Result<RunResponse, ClientError> {
        self.run(&format!("{applet_id}/run"), request).await
    }

    async fn run(&self, route: &str, request: &RunRequest) -> Result<RunResponse, ClientError> {
        let payload = serde_json::to_value(request)
            .map_err(|e| ClientError::UnexpectedResponse(format!("unencodable run request: {e}")))?;
        let body = self.call(route, &payload).await?;
        serde_json::from_value(body)
            .map_err(|e| ClientError::UnexpectedResponse(format!("malformed run response: {e}")))
    }

    /// Describe a job.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response is malformed.
    pub async fn job_describe(&self, job_id: &str) -> Result<JobDescribe, ClientError> {
        let body = self.describe(job_id).await?;
        serde_json::from_value(body).map_err(|e| {
            ClientError::UnexpectedResponse(format!("malformed job describe: {e}"))
        })
    }

    /// Poll a job until it reaches a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::JobFailed`] if the job fails or is terminated,
    /// or any describe error encountered while polling.
    pub async fn wait_on_done(
        &self,
        job_id: &str,
        interval: Duration,
    ) -> Result<JobDescribe, ClientError> {
        loop {
            let describe = self.job_describe(job_id).await?;
            if describe.state.is_terminal() {
                if describe.state.is_failure() {
                    return Err(ClientError::JobFailed {
                        id: describe.id,
                        state: describe.state.to_string(),
                    });
                }
                debug!(job = %describe.id, "job reached terminal state");
                return Ok(describe);
            }
            trace!(job = %job_id, state = %describe.state, "job still running");
            tokio::time::sleep(interval).await;
        }
    }
}
