use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::flow::context::Context;

/// Result of a task execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Response to return to the caller; the last task's response is the
    /// run's response.
    pub response: Option<String>,
    /// Short status line for logging.
    pub status_message: Option<String>,
}

impl TaskResult {
    pub fn new(response: Option<String>) -> Self {
        Self {
            response,
            status_message: None,
        }
    }

    pub fn new_with_status(response: Option<String>, status_message: impl Into<String>) -> Self {
        Self {
            response,
            status_message: Some(status_message.into()),
        }
    }
}

/// Core trait that all pipeline tasks implement.
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique identifier for this task.
    fn id(&self) -> &str;

    /// Execute the task with the given context.
    async fn run(&self, context: Context) -> Result<TaskResult>;
}
