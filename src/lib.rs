//! # Commerce A2A
//!
//! An Agent2Agent (A2A) task-exchange runtime for autonomous commerce
//! agents: shopping assistants, merchants, and payment processors speaking
//! JSON-RPC 2.0 over HTTP.
//!
//! The crate covers both sides of the wire. Inbound, an [`server::AgentServer`]
//! decodes `sendMessage` requests and hands them to an
//! [`executor::AgentExecutor`], which routes the free-text instruction to a
//! registered tool (optionally via an LLM classifier) and mutates the task
//! through an [`executor::TaskUpdater`]. Outbound, an [`client::AgentClient`]
//! wraps a Tower service over a pluggable transport and codec, so one agent's
//! tool can call the next agent in the chain.
//!
//! ## Example
//!
//! ```rust,no_run
//! use commerce_a2a::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "https://merchant.example.com".parse().unwrap();
//!     let mut client = A2AClientBuilder::new_http(url).build()?;
//!
//!     let agent_card = client.discover().await?;
//!     println!("Connected to: {}", agent_card.name);
//!
//!     let task = client.send_message(Message::user("find running shoes")).await?;
//!     println!("Task {} finished as {:?}", task.id, task.status.state);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod executor;
pub mod llm;
pub mod protocol;
pub mod server;
pub mod service;
pub mod store;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AClientBuilder, AgentClient, ClientConfig},
        executor::{AgentExecutor, BaseExecutor, FunctionResolver, TaskUpdater, ToolInfo},
        protocol::error::{A2AError, A2AResult},
        protocol::{
            A2AOperation, AgentCard, Artifact, Message, MessageBuilder, Part, Role, Task,
            TaskState, TaskStatus,
        },
        server::AgentServer,
        store::MerchantStore,
    };
}
