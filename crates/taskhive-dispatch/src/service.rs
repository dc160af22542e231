//! `TaskDispatchService` implementation: pops from the configured backend
//! for the requested worker kind.

use std::str::FromStr;
use std::sync::Arc;

use taskhive_ingress::Backend;
use taskhive_shared::task::WorkerKind;
use tonic::{Request, Response, Status};

use crate::convert::internal_task_to_proto;
use crate::proto::{
    task_dispatch_service_server::TaskDispatchService, GetTaskRequest, GetTaskResponse,
};

#[derive(Debug)]
pub struct TaskDispatchServiceImpl {
    backend: Arc<dyn Backend>,
}

impl TaskDispatchServiceImpl {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[tonic::async_trait]
impl TaskDispatchService for TaskDispatchServiceImpl {
    async fn get_task(
        &self,
        request: Request<GetTaskRequest>,
    ) -> Result<Response<GetTaskResponse>, Status> {
        let worker_kind_raw = request.into_inner().worker_kind;
        let kind = WorkerKind::from_str(&worker_kind_raw)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let task = self
            .backend
            .pop(kind)
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::not_found(format!("queue empty: {}", kind.queue_name())))?;

        tracing::debug!(worker_kind = ?kind, task_id = %task.id, "dispatched task");

        let proto_task = internal_task_to_proto(&task, kind)?;
        Ok(Response::new(GetTaskResponse {
            task: Some(proto_task),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taskhive_ingress::LocalBackend;
    use taskhive_queue::manager::QueueManager;
    use taskhive_shared::task::{InternalTask, Task};
    use tonic::Code;

    fn service_with_manager() -> (TaskDispatchServiceImpl, Arc<QueueManager>) {
        let manager = Arc::new(QueueManager::new());
        let backend: Arc<dyn Backend> = Arc::new(LocalBackend::new(manager.clone()));
        (TaskDispatchServiceImpl::new(backend), manager)
    }

    #[tokio::test]
    async fn get_task_returns_not_found_on_empty_queue() {
        let (service, _manager) = service_with_manager();
        let result = service
            .get_task(Request::new(GetTaskRequest {
                worker_kind: "native".to_string(),
            }))
            .await;
        assert_eq!(result.unwrap_err().code(), Code::NotFound);
    }

    #[tokio::test]
    async fn get_task_rejects_unknown_worker_kind() {
        let (service, _manager) = service_with_manager();
        let result = service
            .get_task(Request::new(GetTaskRequest {
                worker_kind: "quantum".to_string(),
            }))
            .await;
        assert_eq!(result.unwrap_err().code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn get_task_returns_queued_task() {
        let (service, manager) = service_with_manager();
        manager.push(
            WorkerKind::Native,
            InternalTask::new(Task {
                task_type: "send_email".to_string(),
                payload: serde_json::json!({"to": "a@b.com"}),
                priority: 4,
                deadline: None,
                recurring: None,
            }),
        );
        let response = service
            .get_task(Request::new(GetTaskRequest {
                worker_kind: "native".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        let task = response.task.unwrap();
        assert_eq!(task.task_type, "send_email");
        assert_eq!(task.priority, 4);
        assert_eq!(task.worker_kind, "native");
    }
}
