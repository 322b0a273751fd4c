//! Request and response descriptors
//!
//! The pipeline service describes each call as an [`ApiRequest`] and hands it
//! to a [`Transport`](crate::transport::Transport), which answers with the raw
//! [`ApiResponse`]. Interpreting the status code and body is left to the caller
//! of the transport.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// Version of a GoCD API resource
///
/// Versioned endpoints are selected through the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion(u8);

impl ApiVersion {
    pub const V1: ApiVersion = ApiVersion(1);
    pub const V4: ApiVersion = ApiVersion(4);

    pub const fn new(version: u8) -> Self {
        Self(version)
    }

    /// Value of the `Accept` header that pins this version
    pub fn accept_header(&self) -> String {
        format!("application/vnd.go.cd.v{}+json", self.0)
    }
}

/// A call against the API, relative to the API root
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Resource path without a leading slash (e.g. `pipelines/foo/status`)
    pub path: String,
    /// Pinned resource version; unversioned JSON when `None`
    pub api_version: Option<ApiVersion>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            api_version: None,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    /// Value of the `Accept` header for this request
    pub fn accept(&self) -> String {
        match self.api_version {
            Some(version) => version.accept_header(),
            None => "application/json".to_string(),
        }
    }

    /// First header called `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response metadata and body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body text suitable for error messages
    pub fn message(&self) -> String {
        let text = self.text();
        let text = text.trim();
        if text.is_empty() {
            return "Unknown error".to_string();
        }

        // GoCD wraps errors as {"message": "..."}
        serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|json| json["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| text.to_string())
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// A decoded result together with the response it came from
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub body: T,
    pub meta: ApiResponse,
}

impl<T> Response<T> {
    pub fn new(body: T, meta: ApiResponse) -> Self {
        Self { body, meta }
    }

    pub fn into_body(self) -> T {
        self.body
    }

    pub fn status_code(&self) -> u16 {
        self.meta.status_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_header() {
        assert_eq!(ApiRequest::get("pipelines/a/status").accept(), "application/json");
        assert_eq!(
            ApiRequest::post("admin/pipelines")
                .with_api_version(ApiVersion::V4)
                .accept(),
            "application/vnd.go.cd.v4+json"
        );
    }

    #[test]
    fn test_request_headers() {
        let req = ApiRequest::post("pipelines/a/pause").with_header("Confirm", "true");
        assert_eq!(req.header("confirm"), Some("true"));
        assert_eq!(req.header("X-Other"), None);
    }

    #[test]
    fn test_with_json() {
        let req = ApiRequest::post("admin/pipelines")
            .with_json(&serde_json::json!({"group": "first"}))
            .unwrap();
        assert_eq!(req.body, Some(serde_json::json!({"group": "first"})));
    }

    #[test]
    fn test_response_message() {
        let json = ApiResponse::new(
            StatusCode::NOT_FOUND,
            HeaderMap::new(),
            br#"{"message": "Pipeline 'foo' not found."}"#.to_vec(),
        );
        assert_eq!(json.message(), "Pipeline 'foo' not found.");

        let plain = ApiResponse::new(StatusCode::CONFLICT, HeaderMap::new(), b"locked\n".to_vec());
        assert_eq!(plain.message(), "locked");
    }
}
