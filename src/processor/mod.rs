//! Instruction processor abstraction
//!
//! The processor is the only external capability this service depends on: a
//! component that maps an instruction string to a response string. The trait
//! keeps the handler decoupled from any concrete model backend and makes the
//! whole request path testable with a mock.

pub mod groq;

pub use groq::{GroqConfig, GroqProcessor};

use async_trait::async_trait;
use thiserror::Error;

/// Processor trait for dependency injection and testing
#[async_trait]
pub trait InstructionProcessor: Send + Sync {
    /// Get the processor name (e.g., "groq", "mock")
    fn name(&self) -> &str;

    /// Map an instruction to a response string
    ///
    /// One shot: implementations must not retry on failure.
    async fn process(&self, instruction: &str) -> Result<String, ProcessorError>;

    /// Check if the processor is configured and reachable
    async fn health_check(&self) -> Result<(), ProcessorError>;
}

/// Instruction processor errors
#[derive(Debug, Clone, Error)]
pub enum ProcessorError {
    #[error("Processor not configured: {0}")]
    NotConfigured(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
