//! Shared types, error taxonomy, configuration, and logging init for taskhive.

pub mod config;
pub mod error;
pub mod logging;
pub mod task;

pub use error::{CoreError, CoreResult};
pub use task::{InternalTask, Task, TaskType, WorkerKind};
