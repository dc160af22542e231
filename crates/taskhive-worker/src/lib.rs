//! In-process worker, external (subprocess) worker, the worker supervisor
//! that distributes and owns both fleets, and the task-handler registry the
//! native worker dispatches into.

pub mod dispatcher;
pub mod external;
pub mod handlers;
pub mod native;
pub mod supervisor;

pub use dispatcher::{TaskDispatcher, TaskHandler};
pub use external::ExternalWorker;
pub use native::NativeWorker;
pub use supervisor::WorkerSupervisor;

use async_trait::async_trait;
use taskhive_shared::error::CoreError;

/// Common capability interface both worker kinds implement, mirroring the
/// original's `Worker` interface (`Start`/`Stop`/`HealthCheck`/`ID`).
#[async_trait]
pub trait WorkerHandle: Send + Sync {
    fn id(&self) -> &str;
    async fn start(&mut self) -> Result<(), CoreError>;
    async fn stop(&mut self) -> Result<(), CoreError>;
    fn health_check(&self) -> Result<(), CoreError>;
}
