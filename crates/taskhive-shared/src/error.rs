//! Error taxonomy shared by every taskhive crate.
//!
//! Variants map directly onto the error-handling design: validation errors
//! are never logged as incidents, capacity/backend errors surface as 503
//! with no retry, dispatch-empty is an expected not-found, handler failures
//! are logged at debug with no retry/DLQ, worker-lifecycle errors are
//! aggregated by the supervisor, and unrecoverable errors exit the process.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or out-of-range input. Never logged as an incident.
    #[error("validation error: {0}")]
    Validation(String),

    /// The queue/storage backend is unavailable or over capacity.
    #[error("backend unavailable: {0}")]
    Backend(String),

    /// Dispatch found no task to hand out. Expected, not an error condition
    /// in the operational sense, but modeled as one so callers must decide.
    #[error("queue empty for worker kind: {0}")]
    DispatchEmpty(String),

    /// A task handler returned an error while running.
    #[error("handler failed for task {task_id}: {source}")]
    Handler {
        task_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A worker failed to start, stop, or report healthy.
    #[error("worker lifecycle error: {0}")]
    WorkerLifecycle(String),

    /// A worker did not stop within its shutdown timeout.
    #[error("worker {worker_id} did not stop within {timeout_secs}s")]
    ShutdownTimeout { worker_id: String, timeout_secs: u64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    /// An error the process cannot meaningfully recover from.
    #[error("unrecoverable error: {0}")]
    Unrecoverable(String),
}

impl CoreError {
    /// Whether the operation that produced this error is worth retrying.
    /// Mirrors the client's `is_recoverable` pattern: only backend/transport
    /// conditions are transient.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CoreError::Backend(_) | CoreError::Transport(_))
    }

    /// Whether this error represents an incident worth alerting on, as
    /// opposed to expected user or protocol behavior.
    #[must_use]
    pub fn is_incident(&self) -> bool {
        !matches!(
            self,
            CoreError::Validation(_) | CoreError::DispatchEmpty(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_not_an_incident() {
        assert!(!CoreError::Validation("bad".into()).is_incident());
    }

    #[test]
    fn dispatch_empty_is_not_an_incident() {
        assert!(!CoreError::DispatchEmpty("native_queue".into()).is_incident());
    }

    #[test]
    fn backend_error_is_recoverable_and_an_incident() {
        let err = CoreError::Backend("redis down".into());
        assert!(err.is_recoverable());
        assert!(err.is_incident());
    }

    #[test]
    fn validation_error_is_not_recoverable() {
        assert!(!CoreError::Validation("bad".into()).is_recoverable());
    }

    #[test]
    fn display_messages_are_stable() {
        let err = CoreError::ShutdownTimeout {
            worker_id: "w-1".into(),
            timeout_secs: 5,
        };
        assert_eq!(
            format!("{err}"),
            "worker w-1 did not stop within 5s"
        );
    }
}
