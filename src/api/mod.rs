//! API message types for the agent endpoint
//!
//! Defines the request/response payload shapes exchanged over HTTP and the
//! bound checks applied to them.

pub mod messages;

pub use messages::{
    validate_request, validate_response, InstructionRequest, InstructionResponse,
    ValidationErrors, MAX_INSTRUCTION_CHARS, MAX_RESPONSE_CHARS,
};
