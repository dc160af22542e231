//! Task and InternalTask types, priority/deadline/recurring semantics, and the
//! worker-kind routing table.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// The set of task types this core knows how to route. Handler *behavior* for
/// each type lives outside the core (see `taskhive-worker::handlers`); the
/// core only needs to know the type string well enough to route it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    SendEmail,
    DownloadFile,
    ProcessImage,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::SendEmail => "send_email",
            TaskType::DownloadFile => "download_file",
            TaskType::ProcessImage => "process_image",
        }
    }
}

impl FromStr for TaskType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send_email" => Ok(TaskType::SendEmail),
            "download_file" => Ok(TaskType::DownloadFile),
            "process_image" => Ok(TaskType::ProcessImage),
            other => Err(CoreError::Validation(format!(
                "invalid task type: {other}"
            ))),
        }
    }
}

/// Which fleet a task type is routed to. `Native` tasks run in-process;
/// `External` tasks are picked up by a subprocess worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerKind {
    Native,
    External,
}

impl WorkerKind {
    /// The queue name a worker of this kind polls, matching the dispatch
    /// contract (per-kind naming, not a single shared queue).
    pub fn queue_name(&self) -> &'static str {
        match self {
            WorkerKind::Native => "native_queue",
            WorkerKind::External => "external_queue",
        }
    }
}

impl FromStr for WorkerKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" | "native_queue" => Ok(WorkerKind::Native),
            "external" | "external_queue" => Ok(WorkerKind::External),
            other => Err(CoreError::Validation(format!(
                "invalid worker kind: {other}"
            ))),
        }
    }
}

/// Routes a task type to the fleet that handles it. `send_email` and
/// `download_file` run natively; `process_image` is routed externally.
pub fn route_task_type(task_type: TaskType) -> WorkerKind {
    match task_type {
        TaskType::SendEmail | TaskType::DownloadFile => WorkerKind::Native,
        TaskType::ProcessImage => WorkerKind::External,
    }
}

/// A user-submitted task, as received over HTTP or from the shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "type")]
    pub task_type: String,
    pub payload: serde_json::Value,
    /// 1-1000, smaller value = higher priority (min-heap ordering).
    pub priority: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl Task {
    /// Mirrors the original's `validateTask`: type must parse, priority must
    /// be in 1..=1000, payload must be non-null.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.task_type.is_empty() {
            return Err(CoreError::Validation("task type cannot be empty".into()));
        }
        TaskType::from_str(&self.task_type)?;
        if self.priority == 0 || self.priority > 1000 {
            return Err(CoreError::Validation(
                "priority must be between 1 and 1000".into(),
            ));
        }
        if self.payload.is_null() {
            return Err(CoreError::Validation("payload is required".into()));
        }
        Ok(())
    }
}

/// An internal task: a validated [`Task`] plus the identity and ordering
/// fields the priority queue and dispatch layer need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalTask {
    pub id: Uuid,
    #[serde(flatten)]
    pub task: Task,
}

impl InternalTask {
    pub fn new(task: Task) -> Self {
        Self {
            id: Uuid::new_v4(),
            task,
        }
    }

    pub fn priority(&self) -> u16 {
        self.task.priority
    }

    /// Greater-than by priority — higher numeric priority value sorts first
    /// in comparisons, matching the original's `GT`. The heap itself treats
    /// smaller `priority` as higher precedence (see `taskhive-queue`).
    pub fn gt(&self, other: &InternalTask) -> bool {
        self.priority() > other.priority()
    }

    pub fn gte(&self, other: &InternalTask) -> bool {
        self.priority() >= other.priority()
    }

    pub fn lt(&self, other: &InternalTask) -> bool {
        self.priority() < other.priority()
    }

    pub fn lte(&self, other: &InternalTask) -> bool {
        self.priority() <= other.priority()
    }

    /// Identity comparison, by id rather than priority.
    pub fn eq_by_id(&self, other: &InternalTask) -> bool {
        self.id == other.id
    }

    pub fn worker_kind(&self) -> Result<WorkerKind, CoreError> {
        let task_type = TaskType::from_str(&self.task.task_type)?;
        Ok(route_task_type(task_type))
    }
}
