//! Message shapes and validation for the agent endpoint
//!
//! This module defines the two payload types crossing the HTTP boundary and
//! the structural checks applied to them. Validation is transport-independent
//! and side-effect free: callers hand in raw JSON and get back either a typed
//! message or a per-field error map.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Maximum accepted instruction length, in characters
pub const MAX_INSTRUCTION_CHARS: usize = 1000;

/// Maximum accepted processor response length, in characters
pub const MAX_RESPONSE_CHARS: usize = 100_000;

/// Inbound payload for `POST /agent/`
///
/// # Examples
/// ```
/// use cooking_agent::api::messages::validate_request;
/// use serde_json::json;
///
/// let raw = json!({"instruction": "How long should I knead bread dough?"});
/// let request = validate_request(&raw).unwrap();
/// assert_eq!(request.instruction, "How long should I knead bread dough?");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstructionRequest {
    /// Free-text cooking question, forwarded verbatim to the processor
    pub instruction: String,
}

/// Outbound payload wrapping the processor's answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstructionResponse {
    /// Processor output text
    pub response: String,
}

/// Field-level validation failures, keyed by field name
///
/// Serializes to the 400 response body, e.g.
/// `{"instruction": ["This field is required."]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any failure was recorded against the given field
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded against the given field
    pub fn field_messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Validate an inbound payload into an [`InstructionRequest`]
///
/// Succeeds iff `raw` carries an `instruction` key holding a string of at
/// most [`MAX_INSTRUCTION_CHARS`] characters. Only an upper bound is
/// enforced; the empty string validates.
pub fn validate_request(raw: &Value) -> Result<InstructionRequest, ValidationErrors> {
    let instruction = validate_text_field(raw, "instruction", MAX_INSTRUCTION_CHARS)?;
    Ok(InstructionRequest { instruction })
}

/// Validate an outbound payload into an [`InstructionResponse`]
///
/// Same contract as [`validate_request`], for the `response` key with the
/// [`MAX_RESPONSE_CHARS`] bound. Run against the wrapped processor output
/// before it is delivered as a success.
pub fn validate_response(raw: &Value) -> Result<InstructionResponse, ValidationErrors> {
    let response = validate_text_field(raw, "response", MAX_RESPONSE_CHARS)?;
    Ok(InstructionResponse { response })
}

/// Check that `raw[field]` is a string of at most `max_chars` characters
///
/// Lengths are counted in characters, not bytes.
fn validate_text_field(
    raw: &Value,
    field: &str,
    max_chars: usize,
) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    match raw.get(field) {
        None => errors.add(field, "This field is required."),
        Some(Value::String(text)) => {
            if text.chars().count() > max_chars {
                errors.add(
                    field,
                    format!("Ensure this field has no more than {max_chars} characters."),
                );
            } else {
                return Ok(text.clone());
            }
        }
        Some(_) => errors.add(field, "Not a valid string."),
    }

    Err(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_valid_request_passes_unchanged() {
        let raw = json!({"instruction": "How do I boil an egg?"});
        let request = validate_request(&raw).unwrap();
        assert_eq!(request.instruction, "How do I boil an egg?");
    }

    #[test]
    fn test_missing_instruction_is_required_error() {
        let raw = json!({});
        let errors = validate_request(&raw).unwrap_err();
        assert_eq!(
            errors.field_messages("instruction"),
            &["This field is required."]
        );
    }

    #[test]
    fn test_non_string_instruction_rejected() {
        let raw = json!({"instruction": 42});
        let errors = validate_request(&raw).unwrap_err();
        assert_eq!(errors.field_messages("instruction"), &["Not a valid string."]);

        let raw = json!({"instruction": ["a", "b"]});
        let errors = validate_request(&raw).unwrap_err();
        assert_eq!(errors.field_messages("instruction"), &["Not a valid string."]);
    }

    #[test]
    fn test_instruction_at_bound_accepted() {
        let raw = json!({"instruction": "x".repeat(MAX_INSTRUCTION_CHARS)});
        let request = validate_request(&raw).unwrap();
        assert_eq!(request.instruction.chars().count(), MAX_INSTRUCTION_CHARS);
    }

    #[test]
    fn test_instruction_over_bound_rejected() {
        let raw = json!({"instruction": "x".repeat(MAX_INSTRUCTION_CHARS + 1)});
        let errors = validate_request(&raw).unwrap_err();
        assert_eq!(
            errors.field_messages("instruction"),
            &["Ensure this field has no more than 1000 characters."]
        );
    }

    #[test]
    fn test_empty_instruction_accepted() {
        // Only an upper bound is enforced. Forwarding empty instructions is
        // a documented open question, not a validation failure.
        let raw = json!({"instruction": ""});
        let request = validate_request(&raw).unwrap();
        assert_eq!(request.instruction, "");
    }

    #[test]
    fn test_length_counted_in_characters_not_bytes() {
        // 1000 multibyte characters are within bound even though the byte
        // length is far larger.
        let raw = json!({"instruction": "é".repeat(MAX_INSTRUCTION_CHARS)});
        assert!(validate_request(&raw).is_ok());
    }

    #[test]
    fn test_non_object_payload_reports_missing_field() {
        let raw = json!("just a string");
        let errors = validate_request(&raw).unwrap_err();
        assert!(errors.contains_field("instruction"));
    }

    #[test]
    fn test_response_at_bound_accepted() {
        let raw = json!({"response": "y".repeat(MAX_RESPONSE_CHARS)});
        assert!(validate_response(&raw).is_ok());
    }

    #[test]
    fn test_response_over_bound_rejected() {
        let raw = json!({"response": "y".repeat(MAX_RESPONSE_CHARS + 1)});
        let errors = validate_response(&raw).unwrap_err();
        assert_eq!(
            errors.field_messages("response"),
            &["Ensure this field has no more than 100000 characters."]
        );
        assert!(!errors.contains_field("instruction"));
    }

    #[test]
    fn test_validation_errors_serialize_as_field_map() {
        let raw = json!({});
        let errors = validate_request(&raw).unwrap_err();
        let serialized = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            serialized,
            json!({"instruction": ["This field is required."]})
        );
    }

    #[test]
    fn test_validation_errors_display() {
        let raw = json!({});
        let errors = validate_request(&raw).unwrap_err();
        assert_eq!(errors.to_string(), "instruction: This field is required.");
    }

    proptest! {
        #[test]
        fn prop_in_bound_instructions_pass_unchanged(text in ".{0,1000}") {
            prop_assume!(text.chars().count() <= MAX_INSTRUCTION_CHARS);
            let raw = json!({"instruction": text.clone()});
            let request = validate_request(&raw).unwrap();
            prop_assert_eq!(request.instruction, text);
        }

        #[test]
        fn prop_over_bound_instructions_fail_on_instruction_field(extra in 1usize..100) {
            let text = "a".repeat(MAX_INSTRUCTION_CHARS + extra);
            let raw = json!({"instruction": text});
            let errors = validate_request(&raw).unwrap_err();
            prop_assert!(errors.contains_field("instruction"));
        }
    }
}
