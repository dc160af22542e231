//! Owns one [`PriorityQueue`] per [`WorkerKind`], replacing the original's
//! package-level `PythonLocalQueue`/`GoLocalQueue` singletons with a struct
//! constructed once at startup and shared via `Arc`.

use std::sync::Mutex;

use dashmap::DashMap;
use taskhive_shared::task::{InternalTask, WorkerKind};

use crate::heap::PriorityQueue;

#[derive(Debug, Default)]
pub struct QueueManager {
    queues: DashMap<WorkerKind, Mutex<PriorityQueue>>,
}

impl QueueManager {
    pub fn new() -> Self {
        let queues = DashMap::new();
        queues.insert(WorkerKind::Native, Mutex::new(PriorityQueue::new()));
        queues.insert(WorkerKind::External, Mutex::new(PriorityQueue::new()));
        Self { queues }
    }

    pub fn push(&self, kind: WorkerKind, task: InternalTask) {
        let queue = self.queues.get(&kind).expect("queues initialized for both kinds");
        queue.lock().expect("queue mutex poisoned").push(task);
    }

    pub fn pop(&self, kind: WorkerKind) -> Option<InternalTask> {
        let queue = self.queues.get(&kind)?;
        queue.lock().expect("queue mutex poisoned").pop()
    }

    pub fn peek_priority(&self, kind: WorkerKind) -> Option<u16> {
        let queue = self.queues.get(&kind)?;
        queue
            .lock()
            .expect("queue mutex poisoned")
            .peek()
            .map(|t| t.priority())
    }

    pub fn len(&self, kind: WorkerKind) -> usize {
        self.queues
            .get(&kind)
            .map(|q| q.lock().expect("queue mutex poisoned").len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, kind: WorkerKind) -> bool {
        self.len(kind) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_shared::task::Task;

    fn task(task_type: &str, priority: u16) -> InternalTask {
        InternalTask::new(Task {
            task_type: task_type.to_string(),
            payload: serde_json::json!({}),
            priority,
            deadline: None,
            recurring: None,
        })
    }

    #[test]
    fn native_and_external_queues_are_independent() {
        let manager = QueueManager::new();
        manager.push(WorkerKind::Native, task("send_email", 3));
        manager.push(WorkerKind::External, task("process_image", 1));

        assert_eq!(manager.len(WorkerKind::Native), 1);
        assert_eq!(manager.len(WorkerKind::External), 1);

        let native_task = manager.pop(WorkerKind::Native).unwrap();
        assert_eq!(native_task.task.task_type, "send_email");
        assert!(manager.is_empty(WorkerKind::Native));
        assert!(!manager.is_empty(WorkerKind::External));
    }

    #[test]
    fn pop_on_empty_queue_returns_none() {
        let manager = QueueManager::new();
        assert!(manager.pop(WorkerKind::Native).is_none());
    }

    #[test]
    fn peek_priority_reflects_current_minimum() {
        let manager = QueueManager::new();
        manager.push(WorkerKind::Native, task("send_email", 5));
        manager.push(WorkerKind::Native, task("send_email", 2));
        assert_eq!(manager.peek_priority(WorkerKind::Native), Some(2));
    }
}
