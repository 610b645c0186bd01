//! Client-side A2A protocol operations

use super::message::Message;

/// Operations a client can issue against an agent
///
/// Each operation is binding-independent; the codec and transport decide how
/// it goes on the wire.
#[derive(Debug, Clone)]
pub enum A2AOperation {
    /// Send a message to an agent, producing a finished task
    SendMessage {
        /// The message to send
        message: Message,
    },

    /// Fetch the agent's self-description card
    DiscoverAgent,
}

impl A2AOperation {
    /// Get the endpoint path for this operation, relative to the agent's
    /// RPC base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            // RPC calls post to the base URL itself
            A2AOperation::SendMessage { .. } => "",
            A2AOperation::DiscoverAgent => "/.well-known/agent-card.json",
        }
    }

    /// Get the HTTP method for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendMessage { .. } => "POST",
            A2AOperation::DiscoverAgent => "GET",
        }
    }
}
