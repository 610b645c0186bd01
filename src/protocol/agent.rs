//! Agent self-description and capability types

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::A2AError;

/// Agent Card: static self-description of an agent
///
/// Published at `/.well-known/agent-card.json`, loaded once at startup and
/// served verbatim thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// Endpoint URL where the agent accepts RPC calls
    pub url: String,

    /// Preferred transport binding (e.g. "JSONRPC")
    #[serde(rename = "preferredTransport")]
    pub preferred_transport: String,

    /// Protocol version tag
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,

    /// Agent version
    pub version: String,

    /// Declared input modalities
    #[serde(rename = "defaultInputModes")]
    pub default_input_modes: Vec<String>,

    /// Declared output modalities
    #[serde(rename = "defaultOutputModes")]
    pub default_output_modes: Vec<String>,

    /// Agent capabilities
    pub capabilities: AgentCapabilities,

    /// Skills the agent advertises
    pub skills: Vec<Skill>,
}

impl AgentCard {
    /// Load an agent card from a JSON file
    ///
    /// Cards are read once at startup; the returned value is served
    /// read-only for the process lifetime.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, A2AError> {
        let data = std::fs::read(path.as_ref()).map_err(|e| {
            A2AError::Other(format!(
                "failed to read agent card {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let card = serde_json::from_slice(&data)?;
        Ok(card)
    }
}

/// Agent capabilities: the declared protocol extensions
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentCapabilities {
    /// Capability extensions declared by this agent
    pub extensions: Vec<Extension>,
}

/// A declared protocol capability identified by a URI
///
/// Extensions are declarative capability negotiation; nothing in the core
/// enforces them automatically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Extension {
    /// Capability URI
    pub uri: String,

    /// Human-readable description of the capability
    pub description: String,

    /// Whether counterparties must support this capability
    pub required: bool,
}

/// A skill the agent advertises on its card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    /// Skill identifier
    pub id: String,

    /// Human-readable skill name
    pub name: String,

    /// Human-readable skill description
    pub description: String,

    /// Optional parameter schema for the skill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    /// Optional tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
