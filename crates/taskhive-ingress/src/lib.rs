//! HTTP ingress: `GET /test` health check, `POST /tasks` enqueue, and the
//! `Backend` abstraction switching between the embedded heap and an
//! external sorted-set store.

pub mod backend;
pub mod error;
pub mod router;

pub use backend::{Backend, LocalBackend, RedisBackend};
pub use error::IngressError;
pub use router::build_router;
