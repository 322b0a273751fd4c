//! GoCD HTTP Client
//!
//! A typed client for the pipeline API of a GoCD server: pipeline status,
//! pause / unpause / lock release, pipeline creation and run history.
//!
//! Every call takes a [`CancellationToken`]; cancelling it aborts the request in
//! flight. Successful calls return a [`Response`] holding the decoded body and
//! the raw response metadata. Failed calls return a [`ClientError`] that still
//! carries the response whenever the server answered.
//!
//! # Example
//!
//! ```no_run
//! use gocd_client::GocdClient;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GocdClient::new("http://localhost:8153/go")?;
//!     let cancel = CancellationToken::new();
//!
//!     let paused = client.pipelines().pause("build-pipeline", &cancel).await?;
//!     println!("paused: {} (status {})", paused.body, paused.status_code());
//!
//!     let history = client.pipelines().get_history("build-pipeline", 0, &cancel).await?;
//!     for run in history.body.pipelines {
//!         println!("run #{}", run.natural_order);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod pagination;
mod pipelines;
pub mod request;
pub mod transport;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use pipelines::{PipelineAction, PipelinesService};
pub use request::{ApiRequest, ApiResponse, ApiVersion, Response};
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpTransport, Transport};

use std::sync::Arc;

/// Entry point to the GoCD API
///
/// Holds one shared [`Transport`] that is never mutated after construction,
/// so a client can be cloned and used from many tasks at once.
#[derive(Clone)]
pub struct GocdClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for GocdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GocdClient").finish_non_exhaustive()
    }
}

impl GocdClient {
    /// Create a client talking HTTP to the server at `server_url`
    ///
    /// # Example
    /// ```
    /// use gocd_client::GocdClient;
    ///
    /// let client = GocdClient::new("http://localhost:8153/go").unwrap();
    /// ```
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(server_url)?))
    }

    /// Create a client on top of a custom transport
    ///
    /// # Example
    /// ```
    /// use gocd_client::{GocdClient, HttpTransport};
    /// use std::time::Duration;
    ///
    /// let transport = HttpTransport::new("http://localhost:8153/go")
    ///     .unwrap()
    ///     .with_timeout(Duration::from_secs(30))
    ///     .with_basic_auth("admin", "secret");
    ///
    /// let client = GocdClient::with_transport(transport);
    /// ```
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client sharing an existing transport
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Pipeline endpoints
    pub fn pipelines(&self) -> PipelinesService {
        PipelinesService::new(Arc::clone(&self.transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(GocdClient::new("http://localhost:8153/go").is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        let err = GocdClient::new("ftp://localhost").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_services_share_transport() {
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new("http://localhost:8153/go").unwrap());
        let client = GocdClient::from_shared(Arc::clone(&transport));

        let _first = client.pipelines();
        let _second = client.clone().pipelines();
        assert_eq!(Arc::strong_count(&transport), 4);
    }
}
