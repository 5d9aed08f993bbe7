//! Request handler for the agent endpoint
//!
//! Orchestrates one request: validate the inbound payload, delegate to the
//! injected instruction processor, validate the outbound payload, and map the
//! result to a terminal outcome. The handler is transport-independent; the
//! HTTP layer renders [`HandlerOutcome`] into a response.

use crate::api::messages::{
    validate_request, validate_response, InstructionResponse, ValidationErrors,
};
use crate::processor::InstructionProcessor;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Terminal result of handling one request
///
/// Every request ends in exactly one of these states; there are no retries
/// and no intermediate states.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    /// Processor answered and the output passed its bound check (200)
    Success(InstructionResponse),
    /// Inbound payload failed validation (400)
    BadInput(ValidationErrors),
    /// Processor failed; carries the error's display string (500)
    ProcessorFailure(String),
    /// Processor answered but the output exceeds the response bound (502)
    ///
    /// Kept distinct from [`HandlerOutcome::BadInput`]: the client's request
    /// was fine, the upstream response was not.
    OversizedResponse {
        /// Character count of the rejected output
        len: usize,
    },
}

impl HandlerOutcome {
    /// HTTP status code this outcome maps to
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerOutcome::Success(_) => 200,
            HandlerOutcome::BadInput(_) => 400,
            HandlerOutcome::ProcessorFailure(_) => 500,
            HandlerOutcome::OversizedResponse { .. } => 502,
        }
    }
}

/// Stateless per-request orchestrator around an injected processor
pub struct RequestHandler {
    processor: Arc<dyn InstructionProcessor>,
}

impl RequestHandler {
    /// Create a new handler around the given processor
    pub fn new(processor: Arc<dyn InstructionProcessor>) -> Self {
        Self { processor }
    }

    /// Name of the underlying processor, for logging and health reporting
    pub fn processor_name(&self) -> &str {
        self.processor.name()
    }

    /// Handle one raw request payload to a terminal outcome
    pub async fn handle(&self, raw: &Value) -> HandlerOutcome {
        let request_id = Uuid::new_v4();

        let request = match validate_request(raw) {
            Ok(request) => request,
            Err(errors) => {
                info!(
                    request_id = %request_id,
                    errors = %errors,
                    "Request validation failed"
                );
                return HandlerOutcome::BadInput(errors);
            }
        };

        info!(
            request_id = %request_id,
            processor = self.processor.name(),
            instruction_chars = request.instruction.chars().count(),
            "Dispatching instruction to processor"
        );

        let output = match self.processor.process(&request.instruction).await {
            Ok(output) => output,
            Err(e) => {
                error!(
                    request_id = %request_id,
                    processor = self.processor.name(),
                    error = %e,
                    "Processor call failed"
                );
                return HandlerOutcome::ProcessorFailure(e.to_string());
            }
        };

        // The outbound payload goes through the same bound machinery as the
        // inbound one before it may be delivered as a success.
        let wrapped = json!({ "response": output });
        match validate_response(&wrapped) {
            Ok(response) => {
                info!(
                    request_id = %request_id,
                    response_chars = response.response.chars().count(),
                    "Instruction processed"
                );
                HandlerOutcome::Success(response)
            }
            Err(_) => {
                let len = output.chars().count();
                error!(
                    request_id = %request_id,
                    response_chars = len,
                    "Processor output exceeds response bound"
                );
                HandlerOutcome::OversizedResponse { len }
            }
        }
    }
}
