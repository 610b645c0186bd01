//! Core A2A protocol types and definitions

pub mod agent;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCapabilities, AgentCard, Extension, Skill};
pub use error::{A2AError, A2AResult};
pub use message::{find_data_part, parse_data_part, DataMap, Message, MessageBuilder, Part, Role};
pub use operation::A2AOperation;
pub use task::{Artifact, Task, TaskState, TaskStatus};
