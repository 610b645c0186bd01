//! Hybrid tool resolution
//!
//! Maps one free-text instruction to exactly one tool name from a fixed
//! registry. Primary tier: an injectable generative-language classifier
//! configured to mandatorily select one declared function. Fallback tier
//! (backend absent, erroring, timing out, or returning no usable selection):
//! case-insensitive substring match of the instruction against each tool
//! name in registry order. The fallback only matches literal tool names;
//! instructions rarely contain them, which is a known weakness preserved
//! from the protocol definition.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;

use crate::{
    llm::{FunctionClassifier, FunctionDeclaration},
    protocol::{
        error::{A2AError, A2AResult},
        message::DataMap,
    },
};

use super::updater::TaskUpdater;

/// Sentinel name returned when no tool matches an instruction
pub const UNKNOWN_TOOL: &str = "unknown";

/// Default bound on one classification round trip
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// A tool handler: receives the message's data parts and the task updater,
/// and is responsible for completing or failing the task.
pub type ToolHandler =
    Arc<dyn Fn(Vec<DataMap>, Arc<TaskUpdater>) -> BoxFuture<'static, A2AResult<()>> + Send + Sync>;

/// One registered tool
#[derive(Clone)]
pub struct ToolInfo {
    /// Tool name, unique within the registry
    pub name: String,

    /// What the tool does, shown to the classifier
    pub description: String,

    /// The handler invoked when this tool is selected
    pub handler: ToolHandler,
}

impl ToolInfo {
    /// Register a tool from an async closure
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Vec<DataMap>, Arc<TaskUpdater>) -> BoxFuture<'static, A2AResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }
}

impl std::fmt::Debug for ToolInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInfo")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Two-tier instruction-to-tool resolver
pub struct FunctionResolver {
    classifier: Option<Arc<dyn FunctionClassifier>>,
    tools: Vec<ToolInfo>,
    declarations: Vec<FunctionDeclaration>,
    instructions: String,
    classify_timeout: Duration,
}

impl FunctionResolver {
    /// Create a resolver over a fixed tool registry, with no classifier
    pub fn new(tools: Vec<ToolInfo>, instructions: impl Into<String>) -> Self {
        let declarations = tools
            .iter()
            .map(|tool| FunctionDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
            })
            .collect();

        Self {
            classifier: None,
            tools,
            declarations,
            instructions: instructions.into(),
            classify_timeout: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }

    /// Attach a classification backend
    pub fn with_classifier(mut self, classifier: Arc<dyn FunctionClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Bound one classification round trip
    pub fn with_classify_timeout(mut self, timeout: Duration) -> Self {
        self.classify_timeout = timeout;
        self
    }

    /// The registered tools
    pub fn tools(&self) -> &[ToolInfo] {
        &self.tools
    }

    /// Resolve which tool serves `instruction`
    ///
    /// Never errors and never blocks past the classify timeout: any backend
    /// failure degrades to the deterministic fallback. The returned name may
    /// be [`UNKNOWN_TOOL`] or (from the classifier) a name that is not
    /// registered; [`get_tool`](Self::get_tool) decides what that means.
    pub async fn determine_tool(&self, instruction: &str) -> String {
        if let Some(classifier) = &self.classifier {
            let selection = tokio::time::timeout(
                self.classify_timeout,
                classifier.select_function(instruction, &self.declarations, &self.instructions),
            )
            .await;

            match selection {
                Ok(Ok(Some(name))) => {
                    tracing::debug!(backend = classifier.name(), tool = %name, "classifier selected tool");
                    return name;
                }
                Ok(Ok(None)) => {
                    tracing::debug!(backend = classifier.name(), "classifier returned no selection");
                }
                Ok(Err(err)) => {
                    tracing::warn!(backend = classifier.name(), error = %err, "classifier error, falling back to simple matching");
                }
                Err(_) => {
                    tracing::warn!(backend = classifier.name(), timeout = ?self.classify_timeout, "classifier timed out, falling back to simple matching");
                }
            }
        }

        self.fallback_selection(instruction)
    }

    /// Deterministic fallback: first tool whose name appears in the
    /// instruction, case-insensitively, in registry order
    fn fallback_selection(&self, instruction: &str) -> String {
        tracing::debug!(instruction, "using fallback tool selection");

        let lowered = instruction.to_lowercase();
        self.tools
            .iter()
            .find(|tool| lowered.contains(&tool.name.to_lowercase()))
            .map(|tool| tool.name.clone())
            .unwrap_or_else(|| UNKNOWN_TOOL.to_string())
    }

    /// Look up a registered tool's handler by name
    pub fn get_tool(&self, name: &str) -> A2AResult<ToolHandler> {
        self.tools
            .iter()
            .find(|tool| tool.name == name)
            .map(|tool| tool.handler.clone())
            .ok_or_else(|| A2AError::ToolNotFound {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for FunctionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionResolver")
            .field("tools", &self.tools)
            .field("has_classifier", &self.classifier.is_some())
            .finish()
    }
}
