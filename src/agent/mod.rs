//! Request orchestration for the agent endpoint

pub mod handler;

pub use handler::{HandlerOutcome, RequestHandler};
