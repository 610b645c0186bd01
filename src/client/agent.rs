//! High-level A2A agent client

use tower_service::Service;

use crate::{
    client::config::ClientConfig,
    protocol::{
        agent::AgentCard, error::A2AError, message::Message, operation::A2AOperation, task::Task,
    },
    service::{A2ARequest, A2AResponse, RequestContext},
};

/// High-level A2A client for calling other agents
///
/// Wraps a Tower service and exposes the two operations of the protocol:
/// submitting a message for execution and discovering the counterparty's
/// card. The service is generic over anything satisfying the Service bounds.
///
/// # Example
///
/// ```rust,no_run
/// use commerce_a2a::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "https://merchant.example.com".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url).build()?;
///
/// let message = Message::user("find running shoes");
/// let task = client.send_message(message).await?;
/// println!("Task {} is {:?}", task.id, task.status.state);
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request context from the client configuration
    fn build_context(&self) -> RequestContext {
        let mut context =
            RequestContext::new(self.config.agent_url.clone()).with_timeout(self.config.timeout);

        if !self.config.required_extensions.is_empty() {
            context = context.with_metadata(
                "X-A2A-Extensions",
                self.config.required_extensions.join(", "),
            );
        }

        context
    }

    /// Send a message to the agent and get the resulting task
    ///
    /// The message is wrapped in a `sendMessage` RPC request whose id is the
    /// message id. The counterparty may answer with a full envelope or a bare
    /// task body; both decode. A JSON-RPC error member surfaces as
    /// [`A2AError::Rpc`].
    pub async fn send_message(&mut self, message: Message) -> Result<Task, A2AError> {
        let operation = A2AOperation::SendMessage { message };

        let request = A2ARequest::new(operation, self.build_context());
        let response = self.service.call(request).await?;

        match response {
            A2AResponse::Task(task) => Ok(*task),
            _ => Err(A2AError::Protocol(
                "Expected task response from send_message".into(),
            )),
        }
    }

    /// Discover agent capabilities by fetching the agent card
    ///
    /// Retrieves the counterparty's metadata from
    /// `/.well-known/agent-card.json`.
    pub async fn discover(&mut self) -> Result<AgentCard, A2AError> {
        let request = A2ARequest::new(A2AOperation::DiscoverAgent, self.build_context());
        let response = self.service.call(request).await?;

        match response {
            A2AResponse::AgentCard(card) => Ok(*card),
            _ => Err(A2AError::Protocol(
                "Expected agent card response from discover".into(),
            )),
        }
    }
}
