//! A2A task types and lifecycle

use serde::{Deserialize, Serialize};

use super::message::{Message, Part};

/// A task in the A2A protocol
///
/// Tasks track one request's lifecycle: its current status, the ordered
/// history of exchanged messages, and the artifacts produced by tools.
/// Exactly one [`TaskUpdater`](crate::executor::TaskUpdater) owns mutation
/// of a given task; a fresh task is created per inbound call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Context identifier correlating related messages and tasks
    #[serde(rename = "contextId")]
    pub context_id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Ordered history of exchanged messages
    pub history: Vec<Message>,

    /// Ordered artifacts accumulated by tools
    pub artifacts: Vec<Artifact>,
}

impl Task {
    /// Create a new task in the `created` state
    pub fn new(id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context_id: context_id.into(),
            status: TaskStatus {
                state: TaskState::Created,
                message: None,
            },
            history: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }
}

/// Current status of a task: a lifecycle state plus an optional
/// explanatory message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// Optional explanatory message (e.g. a failure reason)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// Task lifecycle state
///
/// Lifecycle: created → pending → completed/failed. Completed and failed
/// are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Task has been created and not yet picked up
    Created,

    /// Task is being processed
    Pending,

    /// Task completed successfully
    Completed,

    /// Task failed
    Failed,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// One discrete tool output: a unique id plus ordered parts.
/// Artifacts are accumulated on a task, never replaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    /// Unique identifier of the artifact
    #[serde(rename = "artifactId")]
    pub artifact_id: String,

    /// Contents of the artifact
    pub parts: Vec<Part>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("task-123", "ctx-1");

        assert_eq!(task.id, "task-123");
        assert_eq!(task.context_id, "ctx-1");
        assert_eq!(task.status.state, TaskState::Created);
        assert!(task.status.message.is_none());
        assert!(!task.is_terminal());
    }

    #[test]
    fn test_task_state() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Created.is_terminal());
        assert!(!TaskState::Pending.is_terminal());
    }

    #[test]
    fn test_task_serialization() {
        let task = Task::new("task-123", "ctx-1");

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "task-123");
        assert_eq!(json["contextId"], "ctx-1");
        assert_eq!(json["status"]["state"], "created");
        // History and artifacts always serialize, even empty
        assert!(json["history"].as_array().unwrap().is_empty());
        assert!(json["artifacts"].as_array().unwrap().is_empty());

        let deserialized: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task, deserialized);
    }

    #[test]
    fn test_state_wire_names() {
        assert_eq!(
            serde_json::to_value(TaskState::Completed).unwrap(),
            "completed"
        );
        assert_eq!(serde_json::to_value(TaskState::Failed).unwrap(), "failed");
        assert_eq!(serde_json::to_value(TaskState::Created).unwrap(), "created");
        assert_eq!(serde_json::to_value(TaskState::Pending).unwrap(), "pending");
    }
}
