//! Axum router: `GET /test` health check, `POST /tasks` enqueue.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use taskhive_shared::task::{InternalTask, Task};
use tower_http::trace::TraceLayer;

use crate::{backend::Backend, error::IngressError};

#[derive(Clone)]
struct IngressState {
    backend: Arc<dyn Backend>,
}

pub fn build_router(backend: Arc<dyn Backend>) -> Router {
    let state = IngressState { backend };
    Router::new()
        .route("/test", get(health_check))
        .route("/tasks", post(enqueue_task))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "health": "ok" }))
}

async fn enqueue_task(
    State(state): State<IngressState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), IngressError> {
    // Deserialized from a raw `Value` rather than `Json<Task>` directly: a
    // direct extractor would let axum's own `JsonRejection` intercept
    // malformed payloads (e.g. a `priority` that doesn't fit `u16`) before
    // this handler runs, bypassing the custom 400 body below.
    let task: Task =
        serde_json::from_value(body).map_err(|e| IngressError::Validation(e.to_string()))?;

    task.validate()
        .map_err(|e| IngressError::Validation(e.to_string()))?;

    let internal_task = InternalTask::new(task);
    let kind = internal_task
        .worker_kind()
        .map_err(|e| IngressError::Validation(e.to_string()))?;
    let priority = internal_task.priority();
    let task_type = internal_task.task.task_type.clone();

    state
        .backend
        .enqueue(kind, internal_task)
        .await
        .map_err(|e| IngressError::BackendUnavailable(e.to_string()))?;

    tracing::info!(%task_type, priority, worker_kind = ?kind, "task enqueued");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "Task enqueued!", "priority": priority, "type": task_type })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use taskhive_queue::manager::QueueManager;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let manager = Arc::new(QueueManager::new());
        let backend: Arc<dyn Backend> = Arc::new(LocalBackend::new(manager));
        build_router(backend)
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let router = test_router();
        let response = router
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, json!({ "health": "ok" }));
    }

    #[tokio::test]
    async fn enqueue_valid_task_returns_201() {
        let router = test_router();
        let body = json!({
            "type": "download_file",
            "payload": {"url": "https://example.com/f.zip"},
            "priority": 10
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tasks")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn enqueue_invalid_priority_returns_400() {
        let router = test_router();
        let body = json!({
            "type": "download_file",
            "payload": {"url": "https://example.com/f.zip"},
            "priority": 0
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tasks")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn enqueue_rejects_out_of_range_priority_with_custom_body() {
        // `priority` is a `u16` on `Task`; `-1` can't deserialize into it at
        // all. Raw-`Value` extraction must still route this through the
        // same custom 400 body as a schema-valid-but-rejected task, rather
        // than letting axum's own JSON rejection short-circuit the handler.
        let router = test_router();
        let body = json!({
            "type": "download_file",
            "payload": {"url": "https://example.com/f.zip"},
            "priority": -1
        });
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tasks")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["error"], "Invalid request payload");
    }
}
