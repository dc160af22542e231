//! Conversions between the domain [`InternalTask`] and its proto wire form.

use taskhive_shared::task::{InternalTask, WorkerKind};
use tonic::Status;

use crate::proto;

pub fn internal_task_to_proto(
    task: &InternalTask,
    kind: WorkerKind,
) -> Result<proto::InternalTask, Status> {
    let payload_json = serde_json::to_string(&task.task.payload)
        .map_err(|e| Status::internal(format!("failed to encode payload: {e}")))?;
    Ok(proto::InternalTask {
        id: task.id.to_string(),
        task_type: task.task.task_type.clone(),
        payload_json,
        priority: u32::from(task.task.priority),
        deadline_unix_seconds: task.task.deadline.map(|d| d.timestamp()),
        recurring: task.task.recurring,
        worker_kind: match kind {
            WorkerKind::Native => "native".to_string(),
            WorkerKind::External => "external".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhive_shared::task::Task;

    #[test]
    fn round_trips_basic_fields() {
        let task = InternalTask::new(Task {
            task_type: "send_email".to_string(),
            payload: serde_json::json!({"to": "a@b.com"}),
            priority: 7,
            deadline: None,
            recurring: Some(false),
        });
        let proto = internal_task_to_proto(&task, WorkerKind::Native).unwrap();
        assert_eq!(proto.task_type, "send_email");
        assert_eq!(proto.priority, 7);
        assert_eq!(proto.recurring, Some(false));
        assert_eq!(proto.id, task.id.to_string());
        assert_eq!(proto.worker_kind, "native");
    }
}
