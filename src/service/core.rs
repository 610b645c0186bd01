//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower_service::Service;

use crate::{
    codec::Codec,
    protocol::{error::A2AError, operation::A2AOperation},
    service::{A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Core A2A protocol service that wraps a transport
///
/// Implements the Tower `Service` trait, turning an operation plus context
/// into an encoded transport request and decoding whatever comes back.
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service over `transport` using `codec`
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self { transport, codec }
    }

    /// Build a transport request from an A2A operation
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        let endpoint = req.operation.endpoint();
        let method = req.operation.method();

        let mut transport_req = TransportRequest::new(endpoint, method);

        transport_req = transport_req.header("Content-Type", codec.content_type());
        transport_req = transport_req.header("Accept", codec.content_type());

        for (key, value) in &req.context.metadata {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        if let Some(timeout) = req.context.timeout {
            transport_req = transport_req.timeout(timeout);
        }

        let body = codec.encode_request(&req.operation)?;
        if !body.is_empty() && method != "GET" {
            transport_req = transport_req.body(body);
        }

        Ok(transport_req)
    }

    /// Parse a transport response into an A2A response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if !transport_resp.is_success() {
            return Err(Self::handle_error_response(&transport_resp));
        }

        codec.decode_response(&transport_resp.body, operation)
    }

    /// Turn a non-2xx transport response into an error
    ///
    /// Protocol-level failures arrive as JSON-RPC errors at HTTP 200 and are
    /// surfaced by the codec; anything that lands here is a transport or
    /// infrastructure fault.
    fn handle_error_response(transport_resp: &TransportResponse) -> A2AError {
        if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&transport_resp.body) {
            if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
                return A2AError::Transport(format!(
                    "HTTP {}: {}",
                    transport_resp.status, message
                ));
            }
        }

        A2AError::Transport(format!("HTTP error: {}", transport_resp.status))
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();

        Box::pin(async move {
            let transport_req = Self::build_transport_request(&req, codec.as_ref())?;
            let transport_resp = transport.execute(transport_req).await?;
            Self::parse_transport_response(transport_resp, codec.as_ref(), &req.operation)
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use crate::{
        codec::{JsonRpcCodec, JsonRpcResponse},
        protocol::{message::Message, task::Task},
        service::RequestContext,
        transport::{mock::MockTransport, TransportResponse},
    };

    use super::*;

    fn enveloped_task(task: &Task) -> Bytes {
        let body = serde_json::to_vec(&JsonRpcResponse::success(
            json!("req-1"),
            serde_json::to_value(task).unwrap(),
        ))
        .unwrap();
        Bytes::from(body)
    }

    #[tokio::test]
    async fn test_service_send_message() {
        let transport = MockTransport::new(|req| {
            assert_eq!(req.method, "POST");
            assert_eq!(req.endpoint, "");
            assert_eq!(
                req.headers.get("Content-Type").map(String::as_str),
                Some("application/json")
            );

            let task = Task::new("task-123", "ctx-1");
            TransportResponse::new(200).body(enveloped_task(&task))
        });

        let codec = Arc::new(JsonRpcCodec::new());
        let mut service = A2AProtocolService::new(transport, codec);

        let operation = A2AOperation::SendMessage {
            message: Message::user("Hello"),
        };
        let request = A2ARequest::new(operation, RequestContext::default());

        let response = service.call(request).await.unwrap();
        match response {
            A2AResponse::Task(task) => assert_eq!(task.id, "task-123"),
            _ => panic!("Expected Task response"),
        }
    }

    #[tokio::test]
    async fn test_service_http_error_handling() {
        let transport = MockTransport::new(|_req| {
            TransportResponse::new(503).body(Bytes::from(r#"{"message": "agent unavailable"}"#))
        });

        let codec = Arc::new(JsonRpcCodec::new());
        let mut service = A2AProtocolService::new(transport, codec);

        let operation = A2AOperation::SendMessage {
            message: Message::user("Hello"),
        };
        let request = A2ARequest::new(operation, RequestContext::default());

        let result = service.call(request).await;
        match result {
            Err(A2AError::Transport(msg)) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("agent unavailable"));
            }
            other => panic!("Expected transport error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_service_rpc_error_surfaces() {
        let transport = MockTransport::new(|_req| {
            let body = serde_json::to_vec(&JsonRpcResponse::error(
                json!("req-1"),
                -32603,
                "executor failure",
            ))
            .unwrap();
            TransportResponse::new(200).body(Bytes::from(body))
        });

        let codec = Arc::new(JsonRpcCodec::new());
        let mut service = A2AProtocolService::new(transport, codec);

        let operation = A2AOperation::SendMessage {
            message: Message::user("Hello"),
        };
        let request = A2ARequest::new(operation, RequestContext::default());

        let result = service.call(request).await;
        assert!(matches!(
            result,
            Err(A2AError::Rpc { code: -32603, .. })
        ));
    }

    #[tokio::test]
    async fn test_service_discover_is_get_without_body() {
        let transport = MockTransport::new(|req| {
            assert_eq!(req.method, "GET");
            assert_eq!(req.endpoint, "/.well-known/agent-card.json");
            assert!(req.body.is_empty());

            TransportResponse::new(200).body(Bytes::from(
                r#"{
                    "name": "Test Agent",
                    "description": "A test agent",
                    "url": "http://localhost:8080",
                    "preferredTransport": "JSONRPC",
                    "protocolVersion": "0.3.0",
                    "version": "1.0.0",
                    "defaultInputModes": ["application/json"],
                    "defaultOutputModes": ["application/json"],
                    "capabilities": {"extensions": []},
                    "skills": []
                }"#,
            ))
        });

        let codec = Arc::new(JsonRpcCodec::new());
        let mut service = A2AProtocolService::new(transport, codec);

        let request = A2ARequest::new(A2AOperation::DiscoverAgent, RequestContext::default());
        let response = service.call(request).await.unwrap();

        match response {
            A2AResponse::AgentCard(card) => assert_eq!(card.name, "Test Agent"),
            _ => panic!("Expected AgentCard response"),
        }
    }
}
