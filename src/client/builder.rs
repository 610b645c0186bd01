//! Client builder for assembling the service stack

use std::{sync::Arc, time::Duration};

use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::{Codec, JsonRpcCodec},
    protocol::error::A2AError,
    service::A2AProtocolService,
    transport::{HttpTransport, Transport},
};

/// Builder for constructing A2A clients
///
/// Provides a fluent API for configuring transport, codec, timeout, and
/// declared extensions before assembling the client.
///
/// # Example
///
/// ```rust,no_run
/// use commerce_a2a::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "https://merchant.example.com".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_timeout(Duration::from_secs(60))
///     .build()?;
///
/// let agent_card = client.discover().await?;
/// println!("Connected to: {}", agent_card.name);
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    agent_url: Url,
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    timeout: Duration,
    required_extensions: Vec<String>,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Start a builder; a transport must be supplied before `build`
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            transport: None,
            codec: None,
            timeout: Duration::from_secs(30),
            required_extensions: Vec::new(),
        }
    }

    /// Use a custom transport
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Declare a required extension URI, announced on every call
    pub fn with_required_extension(mut self, uri: impl Into<String>) -> Self {
        self.required_extensions.push(uri.into());
        self
    }

    /// Assemble the client
    ///
    /// # Errors
    ///
    /// Returns an error when no transport has been configured.
    pub fn build(self) -> Result<AgentClient<A2AProtocolService<T>>, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Protocol(
                "Transport not configured. Use new_http() or with_transport()".into(),
            )
        })?;

        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonRpcCodec::new()));
        let service = A2AProtocolService::new(transport, codec);

        let mut config = ClientConfig::new(self.agent_url).with_timeout(self.timeout);
        for uri in self.required_extensions {
            config = config.with_required_extension(uri);
        }

        Ok(AgentClient::new(service, config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a builder wired for the HTTP+JSON binding
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::new(agent_url).with_transport(transport)
    }
}
