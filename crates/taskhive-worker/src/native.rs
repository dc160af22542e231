//! In-process worker: polls its queue kind via the dispatch backend and
//! runs tasks on a tokio task, cancellable via a [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskhive_ingress::Backend;
use taskhive_shared::error::CoreError;
use taskhive_shared::task::WorkerKind;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::dispatcher::TaskDispatcher;
use crate::WorkerHandle;

const STOP_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct NativeWorker {
    id: String,
    kind: WorkerKind,
    backend: Arc<dyn Backend>,
    dispatcher: Arc<TaskDispatcher>,
    cancel: CancellationToken,
    done_rx: Option<oneshot::Receiver<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl NativeWorker {
    pub fn new(
        id: impl Into<String>,
        kind: WorkerKind,
        backend: Arc<dyn Backend>,
        dispatcher: Arc<TaskDispatcher>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            backend,
            dispatcher,
            cancel: CancellationToken::new(),
            done_rx: None,
            handle: None,
        }
    }

    async fn run(
        kind: WorkerKind,
        backend: Arc<dyn Backend>,
        dispatcher: Arc<TaskDispatcher>,
        cancel: CancellationToken,
        done_tx: oneshot::Sender<()>,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                result = backend.pop(kind) => {
                    match result {
                        Ok(Some(task)) => {
                            if let Err(e) = dispatcher.dispatch(&task).await {
                                tracing::debug!(error = %e, task_id = %task.id, "handler failed");
                            }
                        }
                        Ok(None) => tokio::time::sleep(POLL_INTERVAL).await,
                        Err(e) => {
                            tracing::warn!(error = %e, "backend pop failed");
                            tokio::time::sleep(POLL_INTERVAL).await;
                        }
                    }
                }
            }
        }
        let _ = done_tx.send(());
    }
}

#[async_trait]
impl WorkerHandle for NativeWorker {
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&mut self) -> Result<(), CoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        let cancel = self.cancel.clone();
        let backend = self.backend.clone();
        let dispatcher = self.dispatcher.clone();
        let kind = self.kind;
        self.handle = Some(tokio::spawn(Self::run(
            kind, backend, dispatcher, cancel, done_tx,
        )));
        self.done_rx = Some(done_rx);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CoreError> {
        self.cancel.cancel();
        if let Some(done_rx) = self.done_rx.take() {
            tokio::time::timeout(STOP_TIMEOUT, done_rx)
                .await
                .map_err(|_| CoreError::ShutdownTimeout {
                    worker_id: self.id.clone(),
                    timeout_secs: STOP_TIMEOUT.as_secs(),
                })?
                .map_err(|_| CoreError::WorkerLifecycle(format!("{}: done channel dropped", self.id)))?;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        Ok(())
    }

    fn health_check(&self) -> Result<(), CoreError> {
        match &self.handle {
            Some(handle) if handle.is_finished() => Err(CoreError::WorkerLifecycle(format!(
                "{}: task exited unexpectedly",
                self.id
            ))),
            Some(_) => Ok(()),
            None => Err(CoreError::WorkerLifecycle(format!(
                "{}: not started",
                self.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_ingress::LocalBackend;
    use taskhive_queue::manager::QueueManager;

    fn worker() -> NativeWorker {
        let manager = Arc::new(QueueManager::new());
        let backend: Arc<dyn Backend> = Arc::new(LocalBackend::new(manager));
        NativeWorker::new("native-1", WorkerKind::Native, backend, Arc::new(TaskDispatcher::new()))
    }

    #[tokio::test]
    async fn health_check_fails_before_start() {
        let w = worker();
        assert!(w.health_check().is_err());
    }

    #[tokio::test]
    async fn start_then_stop_completes_within_timeout() {
        let mut w = worker();
        w.start().await.unwrap();
        assert!(w.health_check().is_ok());
        w.stop().await.unwrap();
    }
}
