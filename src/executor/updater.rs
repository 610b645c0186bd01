//! Single-owner task mutation guard

use std::sync::Mutex;

use uuid::Uuid;

use crate::protocol::{
    message::{Message, MessageBuilder, Part},
    task::{Artifact, Task, TaskState, TaskStatus},
};

/// Owns one task and funnels all mutation through an internal lock
///
/// Exactly one updater is created per inbound call and never shared across
/// calls; the lock exists for nested same-task mutation within one handling,
/// e.g. a tool spawning concurrent sub-steps.
///
/// Status transitions are monotonic: once the task reaches a terminal state
/// (completed or failed), further status updates are ignored.
#[derive(Debug)]
pub struct TaskUpdater {
    context_id: String,
    task: Mutex<Task>,
}

impl TaskUpdater {
    /// Create an updater owning a fresh task in the `created` state
    pub fn new(context_id: impl Into<String>) -> Self {
        let context_id = context_id.into();
        Self {
            task: Mutex::new(Task::new(Uuid::now_v7().to_string(), context_id.clone())),
            context_id,
        }
    }

    /// The context id of the owned task
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Append a message to the task history
    pub fn add_message(&self, message: Message) {
        let mut task = self.task.lock().expect("task lock poisoned");
        task.history.push(message);
    }

    /// Append a new artifact with a generated id; returns the artifact id
    pub fn add_artifact(&self, parts: Vec<Part>) -> String {
        let artifact_id = Uuid::now_v7().to_string();
        let mut task = self.task.lock().expect("task lock poisoned");
        task.artifacts.push(Artifact {
            artifact_id: artifact_id.clone(),
            parts,
        });
        artifact_id
    }

    /// Set the task status
    ///
    /// Transitions out of a terminal state are ignored; the task a caller
    /// already received as completed or failed never changes shape again.
    pub fn update_status(&self, state: TaskState, message: Option<Message>) {
        let mut task = self.task.lock().expect("task lock poisoned");
        if task.status.state.is_terminal() {
            tracing::warn!(
                task_id = %task.id,
                from = ?task.status.state,
                to = ?state,
                "ignoring status update on terminal task"
            );
            return;
        }
        task.status = TaskStatus { state, message };
    }

    /// Mark the task completed
    pub fn complete(&self) {
        self.update_status(TaskState::Completed, None);
    }

    /// Mark the task failed with an explanatory text-only agent message
    pub fn fail(&self, error_text: impl Into<String>) {
        let message = MessageBuilder::new()
            .context_id(self.context_id.clone())
            .add_text(error_text)
            .build();
        self.update_status(TaskState::Failed, Some(message));
    }

    /// Current task state without exposing the lock
    pub fn state(&self) -> TaskState {
        self.task.lock().expect("task lock poisoned").status.state
    }

    /// Clone of the current task, taken under the lock
    pub fn snapshot(&self) -> Task {
        self.task.lock().expect("task lock poisoned").clone()
    }

    /// Build an agent message correlated to this task's context
    pub fn new_agent_message(&self, parts: Vec<Part>) -> Message {
        let mut message = MessageBuilder::new()
            .context_id(self.context_id.clone())
            .build();
        message.parts = parts;
        message
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::protocol::message::Role;

    use super::*;

    #[test]
    fn test_fresh_task_is_created() {
        let updater = TaskUpdater::new("ctx-1");
        let task = updater.snapshot();

        assert_eq!(task.context_id, "ctx-1");
        assert_eq!(task.status.state, TaskState::Created);
        assert!(task.history.is_empty());
        assert!(task.artifacts.is_empty());
    }

    #[test]
    fn test_add_message_appends_history() {
        let updater = TaskUpdater::new("ctx-1");
        updater.add_message(Message::user("first"));
        updater.add_message(Message::agent("second"));

        let task = updater.snapshot();
        assert_eq!(task.history.len(), 2);
        assert_eq!(task.history[0].text_parts(), vec!["first"]);
        assert_eq!(task.history[1].text_parts(), vec!["second"]);
    }

    #[test]
    fn test_complete_and_fail() {
        let updater = TaskUpdater::new("ctx-1");
        updater.complete();
        assert_eq!(updater.state(), TaskState::Completed);

        let updater = TaskUpdater::new("ctx-1");
        updater.fail("boom");
        let task = updater.snapshot();
        assert_eq!(task.status.state, TaskState::Failed);

        let reason = task.status.message.expect("failure carries a message");
        assert_eq!(reason.role, Role::Agent);
        assert_eq!(reason.text_parts(), vec!["boom"]);
        assert_eq!(reason.context_id.as_deref(), Some("ctx-1"));
    }

    #[test]
    fn test_terminal_state_latches() {
        let updater = TaskUpdater::new("ctx-1");
        updater.complete();

        updater.update_status(TaskState::Pending, None);
        assert_eq!(updater.state(), TaskState::Completed);

        updater.fail("too late");
        assert_eq!(updater.state(), TaskState::Completed);
    }

    #[test]
    fn test_new_agent_message_carries_context() {
        let updater = TaskUpdater::new("ctx-42");
        let msg = updater.new_agent_message(vec![Part::text("hi")]);

        assert_eq!(msg.role, Role::Agent);
        assert_eq!(msg.context_id.as_deref(), Some("ctx-42"));
        assert_eq!(msg.parts.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_add_artifact() {
        let updater = Arc::new(TaskUpdater::new("ctx-1"));
        let n = 32;

        let handles: Vec<_> = (0..n)
            .map(|i| {
                let updater = updater.clone();
                tokio::spawn(async move {
                    let mut data = serde_json::Map::new();
                    data.insert("index".to_string(), json!(i));
                    updater.add_artifact(vec![Part::data(data)]);
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let task = updater.snapshot();
        assert_eq!(task.artifacts.len(), n);

        let mut ids: Vec<_> = task
            .artifacts
            .iter()
            .map(|a| a.artifact_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n, "artifact ids must be distinct");
    }
}
