//! Configuration module
//!
//! Holds the server connection settings and turns them into a client.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use gocd_client::{GocdClient, HttpTransport};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// GoCD server URL, including the context path (e.g., "http://localhost:8153/go")
    pub server_url: String,

    /// Timeout applied to every request
    pub timeout: Duration,

    /// Basic auth username
    pub username: Option<String>,

    /// Basic auth password
    pub password: Option<String>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            bail!("server_url cannot be empty");
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            bail!("server_url must start with http:// or https://");
        }

        if self.timeout.is_zero() {
            bail!("timeout must be greater than 0");
        }

        if self.username.is_some() != self.password.is_some() {
            bail!("username and password must be set together");
        }

        Ok(())
    }

    /// Build a client from this configuration
    pub fn client(&self) -> Result<GocdClient> {
        let mut transport = HttpTransport::new(&self.server_url)
            .context("Failed to create HTTP transport")?
            .with_timeout(self.timeout);

        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            transport = transport.with_basic_auth(username, password);
        }

        Ok(GocdClient::with_transport(transport))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8153/go".to_string(),
            timeout: Duration::from_secs(30),
            username: None,
            password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
        assert!(config.client().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Invalid URL should fail
        config.server_url = "localhost:8153".to_string();
        assert!(config.validate().is_err());

        config.server_url = "https://ci.example.com/go".to_string();
        assert!(config.validate().is_ok());

        // Zero timeout should fail
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.timeout = Duration::from_secs(5);

        // Username without password should fail
        config.username = Some("admin".to_string());
        assert!(config.validate().is_err());

        config.password = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }
}
