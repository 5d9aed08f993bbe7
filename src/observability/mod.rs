//! Observability for the cooking agent service
//!
//! Structured logging configured from the environment. Request-level
//! reporting happens through the handler's tracing fields; health endpoints
//! live on the HTTP server itself.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};
