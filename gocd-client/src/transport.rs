//! Transport layer
//!
//! A [`Transport`] executes one [`ApiRequest`] and returns the raw
//! [`ApiResponse`], whatever its status. Status interpretation belongs to the
//! services built on top of it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};
use crate::request::{ApiRequest, ApiResponse};

/// Executes API requests against a GoCD server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the response
    ///
    /// Implementations must stop waiting for the server once `cancel` fires and
    /// return [`ClientError::Cancelled`].
    async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse>;
}

/// Basic authentication credentials
#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// reqwest implementation of [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Server URL without trailing slash (e.g., "http://localhost:8153/go")
    server_url: String,
    /// HTTP client instance
    client: Client,
    /// Per-request timeout, applied on top of the client's own settings
    timeout: Option<Duration>,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    /// Create a transport for the server at `server_url`
    ///
    /// API paths are resolved against `{server_url}/api/`.
    ///
    /// # Example
    /// ```
    /// use gocd_client::HttpTransport;
    ///
    /// let transport = HttpTransport::new("http://localhost:8153/go").unwrap();
    /// assert_eq!(transport.server_url(), "http://localhost:8153/go");
    /// ```
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        Self::with_client(server_url, Client::new())
    }

    /// Create a transport with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(server_url: impl Into<String>, client: Client) -> Result<Self> {
        let server_url = server_url.into();

        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                server_url
            )));
        }

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            client,
            timeout: None,
            credentials: None,
        })
    }

    /// Set a timeout for every request
    ///
    /// The timeout is set on each request, so a client passed to
    /// [`with_client`](Self::with_client) keeps its own configuration.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Authenticate every request with HTTP basic auth
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Get the server URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Build a full URL from an API path
    fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/api/{}", self.server_url, path)
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(ACCEPT, request.accept());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::InvalidRequest(format!("invalid header name {:?}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::InvalidRequest(format!("invalid header value {:?}: {}", value, e))
            })?;
            builder = builder.header(name, value);
        }

        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status = status.as_u16(), url = %url, "Received response");

        Ok(ApiResponse::new(status, headers, body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse> {
        let path = request.path.clone();

        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                tracing::debug!(path = %path, "Request cancelled");
                Err(ClientError::Cancelled)
            }

            result = self.send(request) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new("http://localhost:8153/go").unwrap();
        assert_eq!(transport.server_url(), "http://localhost:8153/go");
    }

    #[test]
    fn test_transport_trims_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:8153/go/").unwrap();
        assert_eq!(transport.server_url(), "http://localhost:8153/go");
    }

    #[test]
    fn test_transport_rejects_bad_scheme() {
        let err = HttpTransport::new("localhost:8153").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_url_joins_api_root() {
        let transport = HttpTransport::new("https://ci.example.com/go").unwrap();
        assert_eq!(
            transport.url("pipelines/foo/status"),
            "https://ci.example.com/go/api/pipelines/foo/status"
        );
        assert_eq!(
            transport.url("/admin/pipelines"),
            "https://ci.example.com/go/api/admin/pipelines"
        );
    }

    #[test]
    fn test_timeout_keeps_custom_client_settings() {
        let transport = HttpTransport::new("http://localhost:8153/go")
            .unwrap()
            .with_basic_auth("admin", "secret")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(transport.timeout, Some(Duration::from_secs(5)));
        assert!(transport.credentials.is_some());
        assert_eq!(transport.server_url(), "http://localhost:8153/go");
    }

    #[test]
    fn test_debug_redacts_password() {
        let transport = HttpTransport::new("http://localhost:8153/go")
            .unwrap()
            .with_basic_auth("admin", "hunter2");
        let debug = format!("{:?}", transport);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
