//! A2A message types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::A2AError;

/// Structured payload of a data part: a JSON object keyed by top-level names.
pub type DataMap = Map<String, Value>;

/// A message in the A2A protocol
///
/// Messages are the primary unit of communication between agents.
/// Each message has a role (user or agent), an ordered sequence of parts
/// (text or structured data), and optional correlation identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message identifier (always present)
    #[serde(rename = "messageId")]
    pub message_id: String,

    /// Role of the message sender
    pub role: Role,

    /// Message content parts, in significant order
    pub parts: Vec<Part>,

    /// Optional context identifier correlating related messages and tasks
    #[serde(rename = "contextId", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Optional task identifier associating the message with a task
    #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Optional metadata for the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DataMap>,
}

impl Message {
    /// Create a user message with a single text part and a generated id
    pub fn user(text: impl Into<String>) -> Self {
        MessageBuilder::new().role(Role::User).add_text(text).build()
    }

    /// Create an agent message with a single text part and a generated id
    pub fn agent(text: impl Into<String>) -> Self {
        MessageBuilder::new().add_text(text).build()
    }

    /// Create a new message builder
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// All text parts, in message order
    pub fn text_parts(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All structured data parts, in message order (cloned for handing to tools)
    pub fn data_parts(&self) -> Vec<DataMap> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Data { data, .. } => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Find the value under `key` in the first data part that contains it.
///
/// Duplicate keys across parts are legal; only the first match is visible.
pub fn find_data_part<'a>(key: &str, data_parts: &'a [DataMap]) -> Option<&'a Value> {
    data_parts.iter().find_map(|data| data.get(key))
}

/// Decode the value under `key` into a typed struct.
///
/// Fails with a decode error if the key is absent from every data part or the
/// value's shape cannot convert into `T`.
pub fn parse_data_part<T: serde::de::DeserializeOwned>(
    key: &str,
    data_parts: &[DataMap],
) -> Result<T, A2AError> {
    let value = find_data_part(key, data_parts)
        .ok_or_else(|| A2AError::Protocol(format!("key {} not found in data parts", key)))?;

    serde_json::from_value(value.clone())
        .map_err(|e| A2AError::Protocol(format!("failed to decode '{}': {}", key, e)))
}

/// Fluent builder for outbound messages
///
/// Yields a message with a generated id, role `agent`, and an empty part
/// sequence. Parts are appended in insertion order.
#[derive(Debug)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Create a new message builder
    pub fn new() -> Self {
        Self {
            message: Message {
                message_id: Uuid::now_v7().to_string(),
                role: Role::Agent,
                parts: Vec::new(),
                context_id: None,
                task_id: None,
                metadata: None,
            },
        }
    }

    /// Set the role of the message
    pub fn role(mut self, role: Role) -> Self {
        self.message.role = role;
        self
    }

    /// Append a text part
    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        self.message.parts.push(Part::text(text));
        self
    }

    /// Append a structured data part
    ///
    /// A null value is skipped. A non-empty `key` nests the value under it.
    /// An empty `key` with an object value merges the object directly;
    /// any other value is wrapped under a synthetic `"data"` key.
    pub fn add_data(mut self, key: &str, value: Value) -> Self {
        if value.is_null() {
            return self;
        }

        let data = if !key.is_empty() {
            let mut map = DataMap::new();
            map.insert(key.to_string(), value);
            map
        } else {
            match value {
                Value::Object(map) => map,
                other => {
                    let mut map = DataMap::new();
                    map.insert("data".to_string(), other);
                    map
                }
            }
        };

        self.message.parts.push(Part::data(data));
        self
    }

    /// Set the context ID
    pub fn context_id(mut self, id: impl Into<String>) -> Self {
        self.message.context_id = Some(id.into());
        self
    }

    /// Set the task ID
    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.message.task_id = Some(id.into());
        self
    }

    /// Build the message
    pub fn build(self) -> Message {
        self.message
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    User,

    /// Message from an agent
    Agent,
}

/// A part of a message
///
/// A part carries exactly one of: text, structured data. Counterpart
/// implementations that emit a `kind` discriminator decode fine here; the
/// extra field is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text {
        /// The text content
        text: String,

        /// Optional part metadata
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<DataMap>,
    },

    /// Structured data
    Data {
        /// The structured data object
        data: DataMap,

        /// Optional part metadata
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<DataMap>,
    },
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// Create a data part
    pub fn data(data: DataMap) -> Self {
        Self::Data {
            data,
            metadata: None,
        }
    }

    /// The text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The data object, if this is a data part
    pub fn as_data(&self) -> Option<&DataMap> {
        match self {
            Part::Data { data, .. } => Some(data),
            _ => None,
        }
    }
}
