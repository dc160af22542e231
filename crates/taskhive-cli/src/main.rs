//! `taskhive` binary: loads config, wires the queue backend, HTTP ingress,
//! gRPC dispatch server, and worker fleet, then drops into the interactive
//! shell. Mirrors the original's `main.go` + `cmd/start.go` + `grpc/main.go`.

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use taskhive_dispatch::proto::task_dispatch_service_server::TaskDispatchServiceServer;
use taskhive_dispatch::TaskDispatchServiceImpl;
use taskhive_ingress::{Backend, LocalBackend, RedisBackend};
use taskhive_queue::manager::QueueManager;
use taskhive_shared::config::{AppConfig, BackendMode};
use taskhive_shared::task::{TaskType, WorkerKind};
use taskhive_worker::handlers::{DownloadFileHandler, SendEmailHandler};
use taskhive_worker::{external::ExternalWorkerConfig, ExternalWorker, NativeWorker, TaskDispatcher, WorkerSupervisor};

const GRPC_PORT: u16 = 50051;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load();
    let cli = cli::Cli::parse();

    let cli::Command::Start { mode, workers } = cli.command;
    if let Some(mode) = mode {
        config.mode = BackendMode::parse(&mode)?;
    }
    if let Some(workers) = workers {
        config.workers = workers;
    }

    taskhive_shared::logging::init("taskhive_cli=info", config.dev_mode)?;
    tracing::info!(?config.mode, workers = config.workers, "taskhive starting");

    let backend: Arc<dyn Backend> = match config.mode {
        BackendMode::Local => Arc::new(LocalBackend::new(Arc::new(QueueManager::new()))),
        BackendMode::ExternalStore => {
            Arc::new(RedisBackend::new(&config.redis.host, config.redis.port)?)
        }
    };

    let ingress_router = taskhive_ingress::build_router(backend.clone());
    let ingress_addr = format!("{}:{}", config.host, config.port);
    let ingress_listener = tokio::net::TcpListener::bind(&ingress_addr).await?;
    tracing::info!(addr = %ingress_addr, "HTTP ingress listening");
    let ingress_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(ingress_listener, ingress_router).await {
            tracing::error!(error = %e, "ingress server exited");
        }
    });

    let dispatch_service = TaskDispatchServiceImpl::new(backend.clone());
    let grpc_addr = format!("0.0.0.0:{GRPC_PORT}").parse()?;
    tracing::info!(addr = %grpc_addr, "gRPC dispatch listening");
    let grpc_task = tokio::spawn(async move {
        if let Err(e) = tonic::transport::Server::builder()
            .add_service(TaskDispatchServiceServer::new(dispatch_service))
            .serve(grpc_addr)
            .await
        {
            tracing::error!(error = %e, "gRPC server exited");
        }
    });

    let mut dispatcher = TaskDispatcher::new();
    dispatcher.register(
        TaskType::DownloadFile,
        Box::new(DownloadFileHandler::new(PathBuf::from("./downloads"))),
    );
    dispatcher.register(
        TaskType::SendEmail,
        Box::new(SendEmailHandler::new(config.brevo.clone())),
    );
    let dispatcher = Arc::new(dispatcher);

    let total_workers = taskhive_worker::supervisor::capped_worker_count(config.workers);
    let (external_count, native_count) = taskhive_worker::supervisor::split_worker_counts(total_workers);

    // External workers are registered before native ones: `start_all` starts
    // in registration order, and the startup contract requires every
    // external worker to come up before any native one.
    let mut supervisor = WorkerSupervisor::new();
    for i in 0..external_count {
        supervisor.add_worker(Box::new(ExternalWorker::new(
            format!("external-{i}"),
            ExternalWorkerConfig {
                interpreter_path: "python3".to_string(),
                entrypoint: "worker.py".to_string(),
                mode: format!("{:?}", config.mode).to_lowercase(),
                is_production: !config.dev_mode,
            },
        )));
    }
    for i in 0..native_count {
        supervisor.add_worker(Box::new(NativeWorker::new(
            format!("native-{i}"),
            WorkerKind::Native,
            backend.clone(),
            dispatcher.clone(),
        )));
    }
    supervisor.start_all().await?;
    tracing::info!(native = native_count, external = external_count, "worker fleet started");

    let shell_backend = backend.clone();
    let runtime_handle = tokio::runtime::Handle::current();
    let shell_result = tokio::task::spawn_blocking(move || {
        taskhive_shell::start_interactive_shell(shell_backend, runtime_handle)
    })
    .await?;
    if let Err(e) = shell_result {
        tracing::warn!(error = %e, "shell exited with an error");
    }

    tracing::info!("shutting down worker fleet");
    supervisor.shutdown().await?;
    ingress_task.abort();
    grpc_task.abort();

    Ok(())
}
