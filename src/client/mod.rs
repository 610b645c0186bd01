//! High-level client API for calling other agents

pub mod agent;
pub mod builder;
pub mod config;

pub use agent::AgentClient;
pub use builder::A2AClientBuilder;
pub use config::ClientConfig;
