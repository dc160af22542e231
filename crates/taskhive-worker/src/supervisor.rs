//! Distributes N requested workers across the native and external fleets
//! (external = N/2, native = N - external, capped at host logical-CPU
//! count), and aggregates start/stop/health-check across both.

use std::time::Duration;

use taskhive_shared::error::CoreError;

use crate::WorkerHandle;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Caps `requested` at the host's available parallelism, matching the
/// original's `min(totalWorkers, runtime.NumCPU())`.
pub fn capped_worker_count(requested: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.min(cpu_count)
}

/// Splits a worker count into (external, native) shares: external gets
/// half (rounded down), native gets the remainder.
pub fn split_worker_counts(total: usize) -> (usize, usize) {
    let external = total / 2;
    let native = total - external;
    (external, native)
}

pub struct WorkerSupervisor {
    workers: Vec<Box<dyn WorkerHandle>>,
}

impl WorkerSupervisor {
    pub fn new() -> Self {
        Self {
            workers: Vec::new(),
        }
    }

    pub fn add_worker(&mut self, worker: Box<dyn WorkerHandle>) {
        self.workers.push(worker);
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Starts all workers in registration order (callers are expected to add
    /// external workers before native ones, per the startup contract). On
    /// any failure, every worker started so far is stopped before the error
    /// is returned, so a partial fleet is never left running.
    pub async fn start_all(&mut self) -> Result<(), CoreError> {
        for i in 0..self.workers.len() {
            if let Err(e) = self.workers[i].start().await {
                for worker in &mut self.workers[..i] {
                    let _ = worker.stop().await;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Stops all workers, aggregating every error rather than short-circuiting
    /// on the first one, so a slow worker doesn't block the others from
    /// being asked to stop. Bounded overall by [`SHUTDOWN_TIMEOUT`].
    pub async fn shutdown(&mut self) -> Result<(), CoreError> {
        let stop_all = async {
            let mut errors = Vec::new();
            for worker in &mut self.workers {
                if let Err(e) = worker.stop().await {
                    errors.push(format!("{}: {e}", worker.id()));
                }
            }
            errors
        };

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, stop_all).await {
            Ok(errors) if errors.is_empty() => Ok(()),
            Ok(errors) => Err(CoreError::WorkerLifecycle(errors.join("; "))),
            Err(_) => Err(CoreError::ShutdownTimeout {
                worker_id: "supervisor".to_string(),
                timeout_secs: SHUTDOWN_TIMEOUT.as_secs(),
            }),
        }
    }

    /// Health-checks every worker, returning `(worker_id, error)` pairs for
    /// any that report unhealthy.
    pub fn health_check(&self) -> Vec<(String, CoreError)> {
        self.workers
            .iter()
            .filter_map(|w| w.health_check().err().map(|e| (w.id().to_string(), e)))
            .collect()
    }
}

impl Default for WorkerSupervisor {
    fn default() -> Self {
        Self::new()
    }
}
