//! Error types for the cooking agent service
//!
//! Per-request failures are expressed through the handler's outcome type;
//! this module covers the process-level errors (startup, configuration,
//! serving) and the sanitizer applied to error text before it leaves the
//! process in an HTTP body.

use thiserror::Error;

/// Main error type for service startup and serving
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Processor error: {0}")]
    ProcessorError(#[from] crate::processor::ProcessorError),

    #[error("Server error: {message}")]
    ServerError { message: String },
}

impl AgentError {
    /// Create a server error
    pub fn server_error<S: Into<String>>(message: S) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }
}

/// Result type for service operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Sanitize error messages to prevent sensitive data leakage
///
/// Processor errors are surfaced verbatim in 500 bodies; anything that looks
/// like a credential or a sensitive path is redacted first, and very long
/// messages are truncated.
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = message.to_string();

    // Remove common secret patterns
    sanitized = regex::Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+")
        .unwrap()
        .replace_all(&sanitized, "${1}=***")
        .to_string();

    // Remove potential file paths that might contain sensitive info
    sanitized =
        regex::Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
            .unwrap()
            .replace_all(&sanitized, "/***REDACTED***/")
            .to_string();

    // Truncate very long messages - ensure total length is <= 500
    if sanitized.len() > 500 {
        let truncate_suffix = "...[truncated]";
        let max_content_len = 500 - truncate_suffix.len();
        sanitized = format!("{}{}", &sanitized[..max_content_len], truncate_suffix);
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ProcessorError;

    #[test]
    fn test_processor_error_wraps_into_agent_error() {
        let error: AgentError = ProcessorError::ApiError("boom".to_string()).into();
        assert!(matches!(error, AgentError::ProcessorError(_)));
        assert!(error.to_string().contains("boom"));
    }

    #[test]
    fn test_server_error_constructor() {
        let error = AgentError::server_error("bind failed");
        assert!(matches!(error, AgentError::ServerError { .. }));
        assert_eq!(error.to_string(), "Server error: bind failed");
    }

    #[test]
    fn test_clean_message_passes_through_unchanged() {
        assert_eq!(
            sanitize_error_message("upstream timed out"),
            "upstream timed out"
        );
    }

    #[test]
    fn test_error_message_sanitization() {
        let sanitized =
            sanitize_error_message("Failed to authenticate: password=secret123 token=abc456");

        assert!(!sanitized.contains("secret123"));
        assert!(!sanitized.contains("abc456"));
        assert!(sanitized.contains("password=***"));
        assert!(sanitized.contains("token=***"));
    }

    #[test]
    fn test_sanitize_case_insensitive() {
        let sanitized = sanitize_error_message("PASSWORD=secret123 Token=abc Key=xyz");

        assert!(!sanitized.contains("secret123"));
        assert!(!sanitized.contains("abc"));
        assert!(!sanitized.contains("xyz"));
    }

    #[test]
    fn test_sanitize_with_colons() {
        let sanitized = sanitize_error_message("password: secret123 token: abc456");

        assert!(!sanitized.contains("secret123"));
        assert!(!sanitized.contains("abc456"));
    }

    #[test]
    fn test_file_path_redaction() {
        let sanitized = sanitize_error_message(
            "Failed to read /home/user/.ssh/id_rsa and /etc/secrets/api.key",
        );

        assert!(sanitized.contains("/***REDACTED***/"));
        assert!(!sanitized.contains("/home/user/.ssh/id_rsa"));
    }

    #[test]
    fn test_long_message_truncation() {
        let long_message = "x".repeat(600);
        let sanitized = sanitize_error_message(&long_message);

        assert!(sanitized.len() <= 500);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_sanitize_exactly_500_chars() {
        let message = "x".repeat(500);
        let sanitized = sanitize_error_message(&message);
        assert_eq!(sanitized.len(), 500);
        assert!(!sanitized.contains("truncated"));
    }

    #[test]
    fn test_sanitize_empty_message() {
        assert_eq!(sanitize_error_message(""), "");
    }
}
