use std::sync::Arc;

use tracing::{error, info};

use crate::error::Result;
use crate::flow::context::Context;
use crate::flow::task::{Task, TaskResult};

/// An ordered list of tasks executed strictly sequentially over one shared
/// context. There is no branching and no retry: a task error aborts the run
/// and every downstream task is skipped.
pub struct Pipeline {
    pub id: String,
    tasks: Vec<Arc<dyn Task>>,
}

impl Pipeline {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task_ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.id()).collect()
    }

    /// Run every task in order. Returns the last task's result.
    pub async fn execute(&self, context: Context) -> Result<TaskResult> {
        let mut last = TaskResult::new(None);

        for task in &self.tasks {
            info!(pipeline = %self.id, task_id = %task.id(), "executing task");

            let result = match task.run(context.clone()).await {
                Ok(result) => result,
                Err(e) => {
                    error!(pipeline = %self.id, task_id = %task.id(), error = %e, "task failed, aborting run");
                    return Err(e);
                }
            };

            if let Some(status) = &result.status_message {
                info!(pipeline = %self.id, task_id = %task.id(), status = %status, "task completed");
            }
            last = result;
        }

        Ok(last)
    }
}

/// Builder for pipelines.
pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            pipeline: Pipeline::new(id),
        }
    }

    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        self.pipeline.tasks.push(task);
        self
    }

    pub fn build(self) -> Pipeline {
        self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct AppendTask {
        id: String,
    }

    #[async_trait]
    impl Task for AppendTask {
        fn id(&self) -> &str {
            &self.id
        }

        async fn run(&self, context: Context) -> Result<TaskResult> {
            let trail: String = context.get("trail").await.unwrap_or_default();
            let trail = format!("{}{};", trail, self.id);
            context.set("trail", trail.clone()).await;
            Ok(TaskResult::new(Some(trail)))
        }
    }

    struct FailingTask;

    #[async_trait]
    impl Task for FailingTask {
        fn id(&self) -> &str {
            "failing"
        }

        async fn run(&self, _context: Context) -> Result<TaskResult> {
            Err(FlowError::ContextError("boom".to_string()))
        }
    }

    struct ProbeTask {
        executed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Task for ProbeTask {
        fn id(&self) -> &str {
            "probe"
        }

        async fn run(&self, _context: Context) -> Result<TaskResult> {
            self.executed.store(true, Ordering::SeqCst);
            Ok(TaskResult::new(None))
        }
    }

    #[tokio::test]
    async fn tasks_run_in_order_and_share_context() {
        let pipeline = PipelineBuilder::new("trail")
            .add_task(Arc::new(AppendTask { id: "a".into() }))
            .add_task(Arc::new(AppendTask { id: "b".into() }))
            .add_task(Arc::new(AppendTask { id: "c".into() }))
            .build();

        let context = Context::new();
        let result = pipeline.execute(context.clone()).await.unwrap();

        assert_eq!(result.response.as_deref(), Some("a;b;c;"));
        let trail: String = context.get("trail").await.unwrap();
        assert_eq!(trail, "a;b;c;");
    }

    #[tokio::test]
    async fn a_failed_task_short_circuits_the_run() {
        let executed = Arc::new(AtomicBool::new(false));
        let pipeline = PipelineBuilder::new("short_circuit")
            .add_task(Arc::new(FailingTask))
            .add_task(Arc::new(ProbeTask {
                executed: executed.clone(),
            }))
            .build();

        let result = pipeline.execute(Context::new()).await;

        assert!(matches!(result, Err(FlowError::ContextError(_))));
        assert!(!executed.load(Ordering::SeqCst), "downstream task must not run");
    }
}
