//! Error types for the GoCD client

use thiserror::Error;

use crate::request::ApiResponse;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the GoCD client
///
/// Whenever the server produced a response, the error carries it so callers
/// can branch on the status code or headers without issuing the call again.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The caller cancelled the request while it was in flight
    #[error("Request cancelled")]
    Cancelled,

    /// API returned a non-success status code
    #[error("API error (status {}): {}", .response.status_code(), .response.message())]
    Api {
        /// The full response, including status and headers
        response: Box<ApiResponse>,
    },

    /// Response body could not be decoded
    #[error("Failed to parse response (status {}): {source}", .response.status_code())]
    Decode {
        source: serde_json::Error,
        response: Box<ApiResponse>,
    },

    /// Request body could not be encoded
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid server URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Create an API error from a response
    pub fn api_error(response: ApiResponse) -> Self {
        Self::Api {
            response: Box::new(response),
        }
    }

    /// Response metadata, when the server answered at all
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Api { response } | Self::Decode { response, .. } => Some(response.as_ref()),
            _ => None,
        }
    }

    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        self.response().map(ApiResponse::status_code)
    }

    /// Check if this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { .. }) && self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { response } if response.status().is_client_error())
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { response } if response.status().is_server_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_api_error_classification() {
        let not_found = ClientError::api_error(response(404, "Not found"));
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());
        assert_eq!(not_found.status(), Some(404));

        let unavailable = ClientError::api_error(response(503, ""));
        assert!(unavailable.is_server_error());
        assert!(!unavailable.is_not_found());
    }

    #[test]
    fn test_api_error_message() {
        let err = ClientError::api_error(response(422, "Pipeline already exists"));
        assert_eq!(
            err.to_string(),
            "API error (status 422): Pipeline already exists"
        );

        let err = ClientError::api_error(response(500, ""));
        assert_eq!(err.to_string(), "API error (status 500): Unknown error");
    }

    #[test]
    fn test_cancelled_has_no_response() {
        let err = ClientError::Cancelled;
        assert!(err.is_cancelled());
        assert!(err.response().is_none());
        assert_eq!(err.status(), None);
    }
}
