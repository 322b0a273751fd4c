//! Pipeline API endpoints
//!
//! [`PipelinesService`] turns pipeline intents into [`ApiRequest`]s, runs them
//! through the shared [`Transport`] and interprets the responses. It keeps no
//! state of its own: pipeline locking and scheduling rules live on the server,
//! and the service only reports what the server answered.

use std::fmt;
use std::sync::Arc;

use gocd_core::domain::instance::{PipelineHistory, PipelineInstance};
use gocd_core::domain::pipeline::Pipeline;
use gocd_core::domain::status::PipelineStatus;
use gocd_core::dto::pipeline::PipelineRequest;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};
use crate::pagination::build_paginated_stub;
use crate::request::{ApiRequest, ApiVersion, Response};
use crate::transport::Transport;

const INSTANCE_PATH: &str = "admin/pipelines/{name}/instance";
const HISTORY_PATH: &str = "pipelines/{name}/history";
const CREATE_PATH: &str = "admin/pipelines";

/// Resource version pinned for pipeline creation
const CREATE_API_VERSION: ApiVersion = ApiVersion::V4;

/// Lifecycle transitions that can be requested for a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineAction {
    Pause,
    Unpause,
    ReleaseLock,
}

impl PipelineAction {
    /// Path segment of the action endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineAction::Pause => "pause",
            PipelineAction::Unpause => "unpause",
            PipelineAction::ReleaseLock => "releaseLock",
        }
    }
}

impl fmt::Display for PipelineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the pipeline endpoints of a GoCD server
///
/// Cloning is cheap; every clone shares the same transport.
#[derive(Clone)]
pub struct PipelinesService {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for PipelinesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelinesService").finish_non_exhaustive()
    }
}

impl PipelinesService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    // =============================================================================
    // Status
    // =============================================================================

    /// Get whether a pipeline is locked, paused and schedulable
    pub async fn get_status(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Response<PipelineStatus>> {
        let request = ApiRequest::get(format!("pipelines/{}/status", name));
        self.fetch(request, cancel).await
    }

    // =============================================================================
    // Lifecycle Actions
    // =============================================================================

    /// Pause a pipeline so it stops scheduling new runs
    ///
    /// The body is `true` only when the server answered exactly 200 OK.
    pub async fn pause(&self, name: &str, cancel: &CancellationToken) -> Result<Response<bool>> {
        self.pipeline_action(name, PipelineAction::Pause, cancel).await
    }

    /// Unpause a pipeline so it handles new build events again
    pub async fn unpause(&self, name: &str, cancel: &CancellationToken) -> Result<Response<bool>> {
        self.pipeline_action(name, PipelineAction::Unpause, cancel).await
    }

    /// Release the lock held by a locked pipeline
    pub async fn release_lock(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Response<bool>> {
        self.pipeline_action(name, PipelineAction::ReleaseLock, cancel).await
    }

    /// Request a lifecycle transition for a pipeline
    ///
    /// Sends `POST pipelines/{name}/{action}` with the `Confirm: true` header the
    /// server requires for these calls. Success is strictly status 200: any
    /// other status, including other 2xx codes, yields `false` rather than an
    /// error. Only transport failures and cancellation are errors.
    pub async fn pipeline_action(
        &self,
        name: &str,
        action: PipelineAction,
        cancel: &CancellationToken,
    ) -> Result<Response<bool>> {
        let request = ApiRequest::post(format!("pipelines/{}/{}", name, action))
            .with_header("Confirm", "true");

        let response = self.transport.execute(request, cancel).await?;
        let success = response.status() == StatusCode::OK;

        if success {
            tracing::info!(pipeline = %name, action = %action, "Pipeline action accepted");
        } else {
            tracing::warn!(
                pipeline = %name,
                action = %action,
                status = response.status_code(),
                "Pipeline action not successful"
            );
        }

        Ok(Response::new(success, response))
    }

    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// Create a pipeline inside `group`
    ///
    /// Returns the server's canonical form of the new pipeline, which may differ
    /// from the input (for example, it carries the assigned version).
    ///
    /// # Example
    /// ```no_run
    /// # use gocd_client::GocdClient;
    /// # use gocd_core::domain::pipeline::Pipeline;
    /// # use gocd_core::domain::stage::{Stage, StageContainer};
    /// # use tokio_util::sync::CancellationToken;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GocdClient::new("http://localhost:8153/go")?;
    ///
    /// let mut pipeline = Pipeline::new("build-pipeline");
    /// pipeline.add_stage(Stage::new("build"));
    ///
    /// let created = client
    ///     .pipelines()
    ///     .create(pipeline, "first", &CancellationToken::new())
    ///     .await?;
    /// println!("version {}", created.body.version);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(
        &self,
        pipeline: Pipeline,
        group: &str,
        cancel: &CancellationToken,
    ) -> Result<Response<Pipeline>> {
        let request = ApiRequest::post(CREATE_PATH)
            .with_api_version(CREATE_API_VERSION)
            .with_json(&PipelineRequest::new(group, pipeline))?;

        self.fetch(request, cancel).await
    }

    // =============================================================================
    // Runs
    // =============================================================================

    /// Get one run of a pipeline
    ///
    /// `offset` is appended to the lookup path when positive.
    pub async fn get_instance(
        &self,
        name: &str,
        offset: i64,
        cancel: &CancellationToken,
    ) -> Result<Response<PipelineInstance>> {
        let request = ApiRequest::get(build_paginated_stub(INSTANCE_PATH, name, offset));
        self.fetch(request, cancel).await
    }

    /// Get a page of pipeline runs, most recent first
    ///
    /// Offset 0 (or below) is the first page.
    pub async fn get_history(
        &self,
        name: &str,
        offset: i64,
        cancel: &CancellationToken,
    ) -> Result<Response<PipelineHistory>> {
        let request = ApiRequest::get(build_paginated_stub(HISTORY_PATH, name, offset));
        self.fetch(request, cancel).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Execute a request and decode a successful JSON body
    ///
    /// Non-2xx statuses become [`ClientError::Api`] carrying the response.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Response<T>> {
        let path = request.path.clone();
        let response = self.transport.execute(request, cancel).await?;

        if !response.status().is_success() {
            tracing::warn!(
                path = %path,
                status = response.status_code(),
                "API request failed"
            );
            return Err(ClientError::api_error(response));
        }

        match response.json() {
            Ok(body) => Ok(Response::new(body, response)),
            Err(source) => Err(ClientError::Decode {
                source,
                response: Box::new(response),
            }),
        }
    }
}
