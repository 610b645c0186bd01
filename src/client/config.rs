//! Client configuration

use std::time::Duration;

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent
    pub agent_url: String,

    /// Default request timeout
    pub timeout: Duration,

    /// Extension URIs this client declares it requires
    ///
    /// Declarative only: the URIs are announced on each call, nothing is
    /// enforced against the counterparty's card.
    pub required_extensions: Vec<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            timeout: Duration::from_secs(30),
            required_extensions: Vec::new(),
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Declare a required extension URI
    pub fn with_required_extension(mut self, uri: impl Into<String>) -> Self {
        self.required_extensions.push(uri.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}
