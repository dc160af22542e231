//! The `Backend` trait abstracts over the two storage modes `spec.md`
//! selects at startup: an embedded in-memory min-heap, and an external
//! sorted-set store addressed with ZADD/ZPOPMIN semantics.

use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use taskhive_shared::task::{InternalTask, WorkerKind};

use crate::error::IngressError;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn enqueue(&self, kind: WorkerKind, task: InternalTask) -> Result<(), IngressError>;
    async fn pop(&self, kind: WorkerKind) -> Result<Option<InternalTask>, IngressError>;
}

/// Backed by the embedded in-process [`taskhive_queue::manager::QueueManager`].
#[derive(Debug, Clone)]
pub struct LocalBackend {
    manager: Arc<taskhive_queue::manager::QueueManager>,
}

impl LocalBackend {
    pub fn new(manager: Arc<taskhive_queue::manager::QueueManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn enqueue(&self, kind: WorkerKind, task: InternalTask) -> Result<(), IngressError> {
        self.manager.push(kind, task);
        Ok(())
    }

    async fn pop(&self, kind: WorkerKind) -> Result<Option<InternalTask>, IngressError> {
        Ok(self.manager.pop(kind))
    }
}

/// Backed by a Redis-compatible sorted-set store, one set per worker kind,
/// named after [`WorkerKind::queue_name`]. Score is task priority; member is
/// the UTF-8 JSON encoding of the [`InternalTask`].
#[derive(Debug, Clone)]
pub struct RedisBackend {
    client: redis::Client,
}

impl RedisBackend {
    pub fn new(host: &str, port: u16) -> Result<Self, IngressError> {
        let url = format!("redis://{host}:{port}");
        let client = redis::Client::open(url)
            .map_err(|e| IngressError::BackendUnavailable(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn enqueue(&self, kind: WorkerKind, task: InternalTask) -> Result<(), IngressError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| IngressError::BackendUnavailable(e.to_string()))?;
        let member = serde_json::to_string(&task)?;
        let score = f64::from(task.priority());
        conn.zadd::<_, _, _, ()>(kind.queue_name(), member, score)
            .await
            .map_err(|e| IngressError::BackendUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn pop(&self, kind: WorkerKind) -> Result<Option<InternalTask>, IngressError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| IngressError::BackendUnavailable(e.to_string()))?;
        let popped: Vec<(String, f64)> = conn
            .zpopmin(kind.queue_name(), 1)
            .await
            .map_err(|e| IngressError::BackendUnavailable(e.to_string()))?;
        match popped.into_iter().next() {
            Some((member, _score)) => {
                let task: InternalTask = serde_json::from_str(&member)?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }
}
