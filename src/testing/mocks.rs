//! Mock implementations for testing
//!
//! Provides a mock [`InstructionProcessor`] with scripted responses, a
//! failure mode, and call recording, to enable testing the request path
//! without external dependencies.

use crate::processor::{InstructionProcessor, ProcessorError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock instruction processor for testing
#[derive(Debug, Default)]
pub struct MockProcessor {
    pub responses: Vec<String>,
    pub current_response: Arc<Mutex<usize>>,
    pub should_fail: bool,
    pub failure_message: String,
    pub processed_instructions: Arc<Mutex<Vec<String>>>,
}

impl MockProcessor {
    /// Create a processor cycling through the given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            ..Default::default()
        }
    }

    /// Create a processor that always returns the same response
    pub fn single_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Create a processor whose calls all fail
    pub fn with_failure() -> Self {
        Self::with_failure_message("Mock processor failure")
    }

    /// Create a failing processor with a specific error message
    pub fn with_failure_message(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            failure_message: message.into(),
            ..Default::default()
        }
    }

    /// Create a processor returning a response of exactly `chars` characters
    pub fn with_response_of_chars(chars: usize) -> Self {
        Self::single_response("r".repeat(chars))
    }

    /// Handle to the instructions this processor has received, in order
    pub fn processed_instructions_handle(&self) -> Arc<Mutex<Vec<String>>> {
        self.processed_instructions.clone()
    }
}

#[async_trait]
impl InstructionProcessor for MockProcessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn process(&self, instruction: &str) -> Result<String, ProcessorError> {
        if self.should_fail {
            return Err(ProcessorError::ApiError(self.failure_message.clone()));
        }

        self.processed_instructions
            .lock()
            .await
            .push(instruction.to_string());

        let mut current = self.current_response.lock().await;
        let response_idx = *current % self.responses.len().max(1);
        *current += 1;

        if self.responses.is_empty() {
            Ok("Mock response".to_string())
        } else {
            Ok(self.responses[response_idx].clone())
        }
    }

    async fn health_check(&self) -> Result<(), ProcessorError> {
        if self.should_fail {
            Err(ProcessorError::ApiError(self.failure_message.clone()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_cycles_responses() {
        let mock = MockProcessor::new(vec!["first".to_string(), "second".to_string()]);

        assert_eq!(mock.process("a").await.unwrap(), "first");
        assert_eq!(mock.process("b").await.unwrap(), "second");
        assert_eq!(mock.process("c").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_mock_records_instructions() {
        let mock = MockProcessor::single_response("answer");
        let processed = mock.processed_instructions_handle();

        mock.process("How do I boil an egg?").await.unwrap();

        assert_eq!(
            processed.lock().await.as_slice(),
            &["How do I boil an egg?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mock_failure_carries_message() {
        let mock = MockProcessor::with_failure_message("upstream timed out");

        let error = mock.process("anything").await.unwrap_err();
        assert!(error.to_string().contains("upstream timed out"));

        assert!(mock.health_check().await.is_err());
    }
}
