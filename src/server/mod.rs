//! JSON-RPC HTTP server for inbound agent requests
//!
//! Routes: `POST <rpc_path>` for the JSON-RPC endpoint,
//! `GET /.well-known/agent-card.json` (also nested under the RPC path) for
//! discovery, and `GET /health`. Protocol failures are reported as JSON-RPC
//! errors at HTTP 200; HTTP status codes are reserved for transport-level
//! faults.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    codec::jsonrpc::{
        JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND,
        METHOD_SEND_MESSAGE, PARSE_ERROR,
    },
    executor::AgentExecutor,
    protocol::{
        agent::AgentCard,
        error::{A2AError, A2AResult},
        message::Message,
    },
};

/// Shared state for the agent server
struct ServerState {
    executor: Arc<dyn AgentExecutor>,
    card: Arc<AgentCard>,
}

/// HTTP server hosting one agent
pub struct AgentServer {
    executor: Arc<dyn AgentExecutor>,
    card: Arc<AgentCard>,
    rpc_path: String,
}

impl AgentServer {
    /// Create a server for an executor and its published card
    pub fn new(executor: Arc<dyn AgentExecutor>, card: AgentCard) -> Self {
        Self {
            executor,
            card: Arc::new(card),
            rpc_path: "/".to_string(),
        }
    }

    /// Mount the RPC endpoint somewhere other than `/`
    pub fn with_rpc_path(mut self, rpc_path: impl Into<String>) -> Self {
        self.rpc_path = rpc_path.into();
        self
    }

    /// Build the Axum router without starting the server
    pub fn router(&self) -> Router {
        let state = Arc::new(ServerState {
            executor: self.executor.clone(),
            card: self.card.clone(),
        });

        let mut router = Router::new()
            .route(&self.rpc_path, post(handle_rpc))
            .route("/.well-known/agent-card.json", get(handle_agent_card))
            .route("/health", get(handle_health));

        // Discovery also answers relative to the RPC path
        if self.rpc_path != "/" {
            let nested = format!(
                "{}/.well-known/agent-card.json",
                self.rpc_path.trim_end_matches('/')
            );
            router = router.route(&nested, get(handle_agent_card));
        }

        router.with_state(state)
    }

    /// Run the server (blocks until shutdown)
    pub async fn serve(self, addr: impl Into<String>) -> A2AResult<()> {
        let addr = addr.into();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| A2AError::Transport(format!("failed to bind {}: {}", addr, e)))?;

        tracing::info!(%addr, agent = %self.card.name, "agent server listening");

        axum::serve(listener, router)
            .await
            .map_err(|e| A2AError::Transport(format!("server error: {}", e)))
    }
}

/// `POST <rpc_path>`
async fn handle_rpc(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(error = %err, "undecodable request envelope");
            return rpc_response(JsonRpcResponse::error(
                Value::Null,
                PARSE_ERROR,
                format!("Invalid JSON-RPC request: {}", err),
            ));
        }
    };

    let id = request.id.clone();

    if request.method != METHOD_SEND_MESSAGE {
        return rpc_response(JsonRpcResponse::error(
            id,
            METHOD_NOT_FOUND,
            format!("Unknown method: {}", request.method),
        ));
    }

    let message: Message = match request.params.get("message") {
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(message) => message,
            Err(err) => {
                return rpc_response(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid message: {}", err),
                ));
            }
        },
        None => {
            return rpc_response(JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                "Missing 'message' in params",
            ));
        }
    };

    tracing::debug!(message_id = %message.message_id, "handling sendMessage");

    let task = match state.executor.handle_request(message, None).await {
        Ok(task) => task,
        Err(err) => {
            tracing::error!(error = %err, "executor error");
            return rpc_response(JsonRpcResponse::error(id, INTERNAL_ERROR, err.to_string()));
        }
    };

    match serde_json::to_value(&task) {
        Ok(result) => rpc_response(JsonRpcResponse::success(id, result)),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode task result");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /.well-known/agent-card.json`
async fn handle_agent_card(State(state): State<Arc<ServerState>>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

/// `GET /health`
async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

fn rpc_response(response: JsonRpcResponse) -> Response {
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::{
        executor::{BaseExecutor, FunctionResolver, ToolInfo},
        protocol::{
            agent::{AgentCapabilities, AgentCard},
            task::{Task, TaskState},
        },
    };

    use super::*;

    fn test_card() -> AgentCard {
        AgentCard {
            name: "Test Merchant".to_string(),
            description: "Sells test goods".to_string(),
            url: "http://localhost:8080".to_string(),
            preferred_transport: "JSONRPC".to_string(),
            protocol_version: "0.3.0".to_string(),
            version: "1.0.0".to_string(),
            default_input_modes: vec!["application/json".to_string()],
            default_output_modes: vec!["application/json".to_string()],
            capabilities: AgentCapabilities::default(),
            skills: vec![],
        }
    }

    fn test_server() -> AgentServer {
        let tool = ToolInfo::new("find_items", "Finds items", |_parts, updater| {
            Box::pin(async move {
                updater.complete();
                Ok(())
            })
        });
        let resolver = Arc::new(FunctionResolver::new(vec![tool], "route instructions"));
        let executor = Arc::new(BaseExecutor::new(resolver));
        AgentServer::new(executor, test_card())
    }

    async fn post_rpc(router: Router, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_send_message_returns_enveloped_task() {
        let router = test_server().router();
        let message = Message::user("find_items please");

        let (status, body) = post_rpc(
            router,
            json!({
                "id": "req-1",
                "jsonrpc": "2.0",
                "method": "sendMessage",
                "params": {"message": serde_json::to_value(&message).unwrap()}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], "req-1");

        let task: Task = serde_json::from_value(body["result"].clone()).unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.history.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_envelope_is_parse_error_at_200() {
        let response = test_server()
            .router()
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_missing_message_is_invalid_params() {
        let (status, body) = post_rpc(
            test_server().router(),
            json!({
                "id": "req-2",
                "jsonrpc": "2.0",
                "method": "sendMessage",
                "params": {}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32602);
        assert_eq!(body["error"]["message"], "Missing 'message' in params");
        assert_eq!(body["id"], "req-2");
    }

    #[tokio::test]
    async fn test_unknown_method_is_method_not_found() {
        let (status, body) = post_rpc(
            test_server().router(),
            json!({
                "id": "req-3",
                "jsonrpc": "2.0",
                "method": "cancelTask",
                "params": {}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_agent_card_served_at_both_paths() {
        let server = test_server().with_rpc_path("/a2a");

        for path in ["/.well-known/agent-card.json", "/a2a/.well-known/agent-card.json"] {
            let response = server
                .router()
                .oneshot(
                    Request::get(path)
                        .body(axum::body::Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let card: AgentCard = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(card.name, "Test Merchant");
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_server()
            .router()
            .oneshot(
                Request::get("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn test_no_text_instruction_still_returns_task_not_rpc_error() {
        let message = json!({
            "messageId": "m-1",
            "role": "user",
            "parts": [{"data": {"sku": "A-1"}}]
        });

        let (status, body) = post_rpc(
            test_server().router(),
            json!({
                "id": "req-4",
                "jsonrpc": "2.0",
                "method": "sendMessage",
                "params": {"message": message}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["error"].is_null());

        let task: Task = serde_json::from_value(body["result"].clone()).unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
    }
}
