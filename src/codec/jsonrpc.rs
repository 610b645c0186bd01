//! JSON-RPC 2.0 codec for the A2A protocol
//!
//! The envelope types here are shared by the server (decoding inbound
//! requests, encoding responses) and the client codec (the reverse). The
//! client side additionally implements dual-path result decoding for
//! compatibility with counterparties that answer with a bare Task instead
//! of a full envelope.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    codec::Codec,
    protocol::{
        agent::AgentCard, error::A2AError, message::Message, operation::A2AOperation, task::Task,
    },
    service::response::A2AResponse,
};

/// JSON-RPC protocol version tag
pub const JSONRPC_VERSION: &str = "2.0";

/// RPC method for submitting a message
pub const METHOD_SEND_MESSAGE: &str = "sendMessage";

/// Invalid JSON was received (envelope undecodable)
pub const PARSE_ERROR: i64 = -32700;

/// The requested RPC method is not exposed by this agent
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid method parameters (missing or malformed message)
pub const INVALID_PARAMS: i64 = -32602;

/// Internal JSON-RPC error (executor failure, payload processing)
pub const INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Request id, echoed back in the response
    pub id: Value,

    /// Always "2.0"
    pub jsonrpc: String,

    /// Method name
    pub method: String,

    /// Method parameters; for `sendMessage`, an object with a `message` key
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Wrap a message in a `sendMessage` request
    ///
    /// The request id is taken from the message id, or generated when the
    /// message id is empty.
    pub fn send_message(message: &Message) -> Result<Self, A2AError> {
        let request_id = if message.message_id.is_empty() {
            Uuid::now_v7().to_string()
        } else {
            message.message_id.clone()
        };

        Ok(Self {
            id: Value::String(request_id),
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: METHOD_SEND_MESSAGE.to_string(),
            params: json!({ "message": serde_json::to_value(message)? }),
        })
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Request id this responds to
    #[serde(default)]
    pub id: Value,

    /// Always "2.0"
    pub jsonrpc: String,

    /// Result payload, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error object, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success response carrying `result`
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response
    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code
    pub code: i64,

    /// Human-readable error message
    pub message: String,
}

/// JSON-RPC 2.0 client codec
///
/// Encodes operations into JSON-RPC request envelopes and decodes responses,
/// falling back to bare-body decoding when no valid envelope is recognized.
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }

    /// Decode a response body into a task
    ///
    /// Tries the envelope first: an error member surfaces as a call error, a
    /// result member is decoded as a Task. A body that is not a valid
    /// envelope is decoded directly as a Task, preserving compatibility with
    /// counterparties answering in either shape.
    fn decode_task(&self, body: &[u8]) -> Result<Task, A2AError> {
        if let Ok(envelope) = serde_json::from_slice::<JsonRpcResponse>(body) {
            if envelope.jsonrpc == JSONRPC_VERSION {
                if let Some(error) = envelope.error {
                    return Err(A2AError::Rpc {
                        code: error.code,
                        message: error.message,
                    });
                }

                let result = envelope.result.ok_or_else(|| {
                    A2AError::Protocol("JSON-RPC response missing 'result' field".to_string())
                })?;

                let task = serde_json::from_value(result).map_err(|e| {
                    A2AError::Protocol(format!("failed to decode task from JSON-RPC result: {}", e))
                })?;
                return Ok(task);
            }
        }

        serde_json::from_slice(body)
            .map_err(|e| A2AError::Protocol(format!("failed to decode response as task: {}", e)))
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        match operation {
            A2AOperation::SendMessage { message } => {
                let request = JsonRpcRequest::send_message(message)?;
                let bytes = serde_json::to_vec(&request)?;
                Ok(Bytes::from(bytes))
            }
            // Discovery is a plain GET with no body
            A2AOperation::DiscoverAgent => Ok(Bytes::new()),
        }
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if body.is_empty() {
            return Ok(A2AResponse::Empty);
        }

        match operation {
            A2AOperation::SendMessage { .. } => {
                let task = self.decode_task(body)?;
                Ok(A2AResponse::Task(Box::new(task)))
            }
            A2AOperation::DiscoverAgent => {
                let card: AgentCard = serde_json::from_slice(body)?;
                Ok(A2AResponse::AgentCard(Box::new(card)))
            }
        }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::{
        message::Message,
        task::{Task, TaskState},
    };

    use super::*;

    #[test]
    fn test_encode_send_message() {
        let codec = JsonRpcCodec::new();
        let message = Message::user("Hello");
        let expected_id = message.message_id.clone();

        let operation = A2AOperation::SendMessage { message };
        let bytes = codec.encode_request(&operation).unwrap();

        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "sendMessage");
        assert_eq!(json["id"], expected_id);
        assert!(json["params"]["message"].is_object());
        assert_eq!(json["params"]["message"]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn test_encode_discover_has_no_body() {
        let codec = JsonRpcCodec::new();
        let bytes = codec.encode_request(&A2AOperation::DiscoverAgent).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_decode_enveloped_task() {
        let codec = JsonRpcCodec::new();
        let task = Task::new("task-123", "ctx-1");
        let body = serde_json::to_vec(&JsonRpcResponse::success(
            json!("req-1"),
            serde_json::to_value(&task).unwrap(),
        ))
        .unwrap();

        let operation = A2AOperation::SendMessage {
            message: Message::user("hi"),
        };
        let response = codec.decode_response(&body, &operation).unwrap();

        match response {
            A2AResponse::Task(decoded) => assert_eq!(*decoded, task),
            _ => panic!("Expected Task response"),
        }
    }

    #[test]
    fn test_decode_bare_task_fallback() {
        let codec = JsonRpcCodec::new();
        let task = Task::new("task-456", "ctx-2");
        let body = serde_json::to_vec(&task).unwrap();

        let operation = A2AOperation::SendMessage {
            message: Message::user("hi"),
        };
        let response = codec.decode_response(&body, &operation).unwrap();

        match response {
            A2AResponse::Task(decoded) => assert_eq!(decoded.id, "task-456"),
            _ => panic!("Expected Task response"),
        }
    }

    #[test]
    fn test_decode_error_response() {
        let codec = JsonRpcCodec::new();
        let body = br#"{
            "jsonrpc": "2.0",
            "error": { "code": -32602, "message": "Missing 'message' in params" },
            "id": "req-123"
        }"#;

        let operation = A2AOperation::SendMessage {
            message: Message::user("hi"),
        };
        let result = codec.decode_response(body, &operation);

        match result {
            Err(A2AError::Rpc { code, message }) => {
                assert_eq!(code, -32602);
                assert!(message.contains("Missing 'message'"));
            }
            other => panic!("Expected Rpc error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_decode_garbage_is_protocol_error() {
        let codec = JsonRpcCodec::new();
        let operation = A2AOperation::SendMessage {
            message: Message::user("hi"),
        };

        let result = codec.decode_response(b"not json at all", &operation);
        assert!(matches!(result, Err(A2AError::Protocol(_))));
    }

    #[test]
    fn test_task_round_trips_through_result() {
        let mut task = Task::new("task-rt", "ctx-rt");
        task.history.push(Message::user("find red shoes"));
        task.status.state = TaskState::Completed;

        let result = serde_json::to_value(&task).unwrap();
        let body =
            serde_json::to_vec(&JsonRpcResponse::success(json!("req"), result)).unwrap();

        let codec = JsonRpcCodec::new();
        let decoded = codec.decode_task(&body).unwrap();
        assert_eq!(decoded, task);
    }

    #[test]
    fn test_request_id_generated_when_message_id_empty() {
        let mut message = Message::user("hi");
        message.message_id = String::new();

        let request = JsonRpcRequest::send_message(&message).unwrap();
        assert!(request.id.as_str().is_some_and(|id| !id.is_empty()));
    }
}
