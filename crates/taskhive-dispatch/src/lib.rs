//! Pull-based dispatch gRPC server: workers call `GetTask` for their kind
//! and receive the next queued [`InternalTask`], or `NOT_FOUND` if empty.

pub mod proto {
    tonic::include_proto!("taskhive.v1");
}

pub mod convert;
pub mod service;

pub use service::TaskDispatchServiceImpl;
