//! Cooking Agent - HTTP front end for a hosted recipe-expert LLM
//!
//! A small, stateless service: `POST /agent/` takes a free-text cooking
//! `instruction`, forwards it to an instruction processor (a Groq-hosted
//! model in production), and returns the model's `response`.
//!
//! # Overview
//!
//! This crate provides:
//! - Payload validation with per-field error reporting
//! - A pluggable instruction processor trait with a Groq implementation
//! - A request handler mapping processor outcomes to HTTP results
//! - A warp server exposing the endpoint plus health probes
//!
//! # Quick Start
//!
//! ```rust
//! use cooking_agent::api::messages::{validate_request, ValidationErrors};
//! use serde_json::json;
//!
//! // A well-formed payload validates into a typed request
//! let raw = json!({"instruction": "How long should I knead bread dough?"});
//! let request = validate_request(&raw).unwrap();
//! assert_eq!(request.instruction, "How long should I knead bread dough?");
//!
//! // A malformed one reports failures per field
//! let errors: ValidationErrors = validate_request(&json!({})).unwrap_err();
//! assert!(errors.contains_field("instruction"));
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod observability;
pub mod processor;
pub mod server;
pub mod testing;

pub use agent::{HandlerOutcome, RequestHandler};
pub use api::messages::{InstructionRequest, InstructionResponse, ValidationErrors};
pub use config::*;
pub use error::{AgentError, AgentResult};
pub use processor::{InstructionProcessor, ProcessorError};
pub use server::AgentServer;
