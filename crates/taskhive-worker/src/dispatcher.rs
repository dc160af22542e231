//! Native-worker task dispatch: unmarshal payload by task type, call the
//! matching handler, log and continue on failure (handler failures never
//! retry or go to a dead-letter queue — the core only dispatches, it does
//! not own handler behavior).

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use taskhive_shared::error::CoreError;
use taskhive_shared::task::{InternalTask, TaskType};

#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, task: &InternalTask) -> anyhow::Result<()>;
}

/// Maps task type to handler and dispatches. Handler failures are wrapped
/// as [`CoreError::Handler`] and returned to the caller (the native worker
/// logs them at debug and moves on, per the error-handling design).
#[derive(Default)]
pub struct TaskDispatcher {
    handlers: HashMap<TaskType, Box<dyn TaskHandler>>,
}

impl TaskDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task_type: TaskType, handler: Box<dyn TaskHandler>) {
        self.handlers.insert(task_type, handler);
    }

    pub async fn dispatch(&self, task: &InternalTask) -> Result<(), CoreError> {
        let task_type = TaskType::from_str(&task.task.task_type)?;
        let handler = self.handlers.get(&task_type).ok_or_else(|| {
            CoreError::Validation(format!("unknown task type: {}", task.task.task_type))
        })?;
        handler
            .handle(task)
            .await
            .map_err(|source| CoreError::Handler {
                task_id: task.id.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_shared::task::Task;

    struct RecordingHandler {
        should_fail: bool,
    }

    #[async_trait]
    impl TaskHandler for RecordingHandler {
        async fn handle(&self, _task: &InternalTask) -> anyhow::Result<()> {
            if self.should_fail {
                anyhow::bail!("boom");
            }
            Ok(())
        }
    }

    fn task(task_type: &str) -> InternalTask {
        InternalTask::new(Task {
            task_type: task_type.to_string(),
            payload: serde_json::json!({}),
            priority: 1,
            deadline: None,
            recurring: None,
        })
    }

    #[tokio::test]
    async fn dispatch_runs_registered_handler() {
        let mut dispatcher = TaskDispatcher::new();
        dispatcher.register(
            TaskType::SendEmail,
            Box::new(RecordingHandler { should_fail: false }),
        );
        assert!(dispatcher.dispatch(&task("send_email")).await.is_ok());
    }

    #[tokio::test]
    async fn dispatch_wraps_handler_failure() {
        let mut dispatcher = TaskDispatcher::new();
        dispatcher.register(
            TaskType::SendEmail,
            Box::new(RecordingHandler { should_fail: true }),
        );
        let err = dispatcher.dispatch(&task("send_email")).await.unwrap_err();
        assert!(matches!(err, CoreError::Handler { .. }));
    }

    #[tokio::test]
    async fn dispatch_rejects_unregistered_type() {
        let dispatcher = TaskDispatcher::new();
        let err = dispatcher.dispatch(&task("send_email")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
