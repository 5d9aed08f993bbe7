//! Groq processor implementation
//!
//! Talks to Groq's OpenAI-compatible chat completions API. One request per
//! instruction, no retries: a failed call surfaces as a processor error and
//! the caller decides what to do with it.

use crate::processor::{InstructionProcessor, ProcessorError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Default Groq API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model used when the configuration names none
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Groq processor configuration
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// System prompt framing every completion
    pub system_prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: "You are a recipe expert. You will be given a recipe or a cooking \
                            question and you have to answer it."
                .to_string(),
            temperature: None,
            max_tokens: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Groq processor implementation
pub struct GroqProcessor {
    config: GroqConfig,
    client: Client,
}

impl GroqProcessor {
    /// Create a new Groq processor
    pub fn new(config: GroqConfig) -> Result<Self, ProcessorError> {
        if config.api_key.is_empty() {
            return Err(ProcessorError::NotConfigured(
                "Groq API key is required".to_string(),
            ));
        }

        Url::parse(&config.base_url).map_err(|e| {
            ProcessorError::NotConfigured(format!(
                "Invalid Groq base URL '{}': {e}",
                config.base_url
            ))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProcessorError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Build the chat completion request for an instruction (pure function)
    fn build_completion_request(&self, instruction: &str) -> GroqCompletionRequest {
        GroqCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                GroqMessage {
                    role: "system".to_string(),
                    content: Some(self.config.system_prompt.clone()),
                },
                GroqMessage {
                    role: "user".to_string(),
                    content: Some(instruction.to_string()),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Extract the answer text from a completion response (pure function)
    fn extract_content(response: GroqCompletionResponse) -> Result<String, ProcessorError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProcessorError::ApiError("No choices returned from Groq".to_string()))?;

        choice.message.content.ok_or_else(|| {
            ProcessorError::InvalidResponse("Groq returned a completion with no content".to_string())
        })
    }

    /// Make single API request (impure I/O)
    async fn make_api_request(
        &self,
        request: &GroqCompletionRequest,
    ) -> Result<GroqCompletionResponse, ProcessorError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let error_msg = format!(
                    "HTTP request failed: {} (is_connect: {}, is_timeout: {})",
                    e,
                    e.is_connect(),
                    e.is_timeout()
                );
                warn!("Groq network error details: {}", error_msg);
                ProcessorError::NetworkError(error_msg)
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Groq API error - Status: {}, Response: {}",
                status, error_text
            );
            return Err(ProcessorError::ApiError(format!(
                "Groq API error: {status} - {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProcessorError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl InstructionProcessor for GroqProcessor {
    fn name(&self) -> &str {
        "groq"
    }

    async fn process(&self, instruction: &str) -> Result<String, ProcessorError> {
        let request = self.build_completion_request(instruction);

        debug!(
            model = %request.model,
            instruction_chars = instruction.chars().count(),
            "Groq completion request"
        );

        let response = self.make_api_request(&request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Groq completion finished"
            );
        }

        Self::extract_content(response)
    }

    async fn health_check(&self) -> Result<(), ProcessorError> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| ProcessorError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProcessorError::AuthenticationFailed(
                "Groq API authentication failed".to_string(),
            ))
        }
    }
}

#[derive(Debug, Serialize)]
struct GroqCompletionRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqCompletionResponse {
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
