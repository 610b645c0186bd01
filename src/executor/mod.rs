//! Inbound request execution
//!
//! [`BaseExecutor`] is the generic per-role dispatcher: it owns a
//! [`FunctionResolver`], mints one [`TaskUpdater`] per inbound call, routes
//! the first text instruction to a tool, and always hands back a decodable
//! task. Role-specific behavior enters through the tool registry and an
//! optional validation predicate, not through subclassing.

pub mod resolver;
pub mod updater;

pub use resolver::{FunctionResolver, ToolHandler, ToolInfo, UNKNOWN_TOOL};
pub use updater::TaskUpdater;

use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::{
    error::A2AResult,
    message::{DataMap, Message},
    task::Task,
};

/// Predicate run against the inbound data parts before any tool is invoked
///
/// A validator that rejects a message is expected to fail the task itself
/// with a reason the counterparty can read.
pub type ValidateFn = dyn Fn(&[DataMap], &TaskUpdater) -> bool + Send + Sync;

/// Handles one inbound message and produces the resulting task
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn handle_request(&self, message: Message, current_task: Option<Task>)
        -> A2AResult<Task>;
}

/// Tool-routing executor shared by every agent role
pub struct BaseExecutor {
    resolver: Arc<FunctionResolver>,
    validator: Option<Arc<ValidateFn>>,
}

impl BaseExecutor {
    /// Create an executor over a tool registry
    pub fn new(resolver: Arc<FunctionResolver>) -> Self {
        Self {
            resolver,
            validator: None,
        }
    }

    /// Attach a validation predicate run before tool dispatch
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&[DataMap], &TaskUpdater) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// The resolver backing this executor
    pub fn resolver(&self) -> &FunctionResolver {
        &self.resolver
    }

    /// Route one inbound message through the tool registry
    ///
    /// Every non-transport failure is reported in-band: the returned task is
    /// failed with a readable reason rather than the call erroring. The tool
    /// itself is responsible for completing or failing the task; it runs on
    /// its own spawned task so a panic inside a handler is contained and
    /// converted into a failed task.
    pub async fn handle_request_with_tools(
        &self,
        message: Message,
        _current_task: Option<Task>,
        validate: Option<&ValidateFn>,
    ) -> A2AResult<Task> {
        let context_id = message
            .context_id
            .clone()
            .unwrap_or_else(|| message.message_id.clone());

        let updater = Arc::new(TaskUpdater::new(context_id));
        updater.add_message(message.clone());

        let data_parts = message.data_parts();

        if let Some(validate) = validate {
            if !validate(&data_parts, &updater) {
                // The predicate normally fails the task with its own reason
                if !updater.state().is_terminal() {
                    updater.fail("Message failed validation");
                }
                return Ok(updater.snapshot());
            }
        }

        let instruction = match message.text_parts().first() {
            Some(text) => text.to_string(),
            None => {
                updater.fail("No text instructions provided");
                return Ok(updater.snapshot());
            }
        };

        let tool_name = self.resolver.determine_tool(&instruction).await;
        let handler = match self.resolver.get_tool(&tool_name) {
            Ok(handler) => handler,
            Err(_) => {
                tracing::warn!(tool = %tool_name, "no registered tool for instruction");
                updater.fail(format!("Tool not found: {}", tool_name));
                return Ok(updater.snapshot());
            }
        };

        tracing::info!(tool = %tool_name, context_id = %updater.context_id(), "dispatching instruction to tool");

        let outcome = tokio::spawn(handler(data_parts, updater.clone())).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(tool = %tool_name, error = %err, "tool returned an error");
                updater.fail(err.to_string());
            }
            Err(join_err) => {
                tracing::error!(tool = %tool_name, error = %join_err, "tool execution aborted");
                updater.fail(format!("Tool execution failed: {}", tool_name));
            }
        }

        Ok(updater.snapshot())
    }
}

#[async_trait]
impl AgentExecutor for BaseExecutor {
    async fn handle_request(
        &self,
        message: Message,
        current_task: Option<Task>,
    ) -> A2AResult<Task> {
        self.handle_request_with_tools(message, current_task, self.validator.as_deref())
            .await
    }
}
