//! Reply service boundary and its OpenAI implementation
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use async_trait::async_trait;
use log::{debug, error, info};
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use uuid::Uuid;

use crate::features::conversation::Role;
use crate::features::personas::RequestPayload;

/// Generation knobs passed with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplyOptions {
    /// Maximum reply length in tokens, within [50, 800]
    pub max_response_length: u32,
    /// Sampling temperature, within [0.0, 1.2]
    pub creativity: f32,
}

impl ReplyOptions {
    pub const MIN_RESPONSE_LENGTH: u32 = 50;
    pub const MAX_RESPONSE_LENGTH: u32 = 800;
    pub const DEFAULT_MAX_RESPONSE_LENGTH: u32 = 300;
    pub const MIN_CREATIVITY: f32 = 0.0;
    pub const MAX_CREATIVITY: f32 = 1.2;
    pub const DEFAULT_CREATIVITY: f32 = 0.7;

    /// Pull both knobs into their allowed ranges
    pub fn clamped(max_response_length: u32, creativity: f32) -> Self {
        let creativity = if creativity.is_nan() {
            Self::DEFAULT_CREATIVITY
        } else {
            creativity.clamp(Self::MIN_CREATIVITY, Self::MAX_CREATIVITY)
        };
        ReplyOptions {
            max_response_length: max_response_length
                .clamp(Self::MIN_RESPONSE_LENGTH, Self::MAX_RESPONSE_LENGTH),
            creativity,
        }
    }
}

impl Default for ReplyOptions {
    fn default() -> Self {
        ReplyOptions {
            max_response_length: Self::DEFAULT_MAX_RESPONSE_LENGTH,
            creativity: Self::DEFAULT_CREATIVITY,
        }
    }
}

/// Why the reply service produced no text. The Display string is what the
/// user sees in place of a reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("reply service timeout after {secs}s")]
    Timeout { secs: u64 },

    #[error("OpenAI API error: {0}")]
    Api(String),

    #[error("no response content from the reply service")]
    EmptyResponse,
}

/// Sends a composed payload to a text-generation service.
///
/// Implementations report every failure as a `GatewayError` value and never panic.
#[async_trait]
pub trait ReplyGateway: Send + Sync {
    async fn send(
        &self,
        payload: &RequestPayload,
        options: &ReplyOptions,
    ) -> Result<String, GatewayError>;
}

/// Chat completion gateway backed by the `openai` crate.
///
/// The API key is read by the crate from the `OPENAI_KEY` environment variable.
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    model: String,
    timeout: Duration,
}

impl OpenAiGateway {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        OpenAiGateway {
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_openai_message(role: Role, content: &str) -> ChatCompletionMessage {
        let role = match role {
            Role::System => ChatCompletionMessageRole::System,
            Role::User => ChatCompletionMessageRole::User,
            Role::Assistant => ChatCompletionMessageRole::Assistant,
        };
        ChatCompletionMessage {
            role,
            content: Some(content.to_string()),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

#[async_trait]
impl ReplyGateway for OpenAiGateway {
    async fn send(
        &self,
        payload: &RequestPayload,
        options: &ReplyOptions,
    ) -> Result<String, GatewayError> {
        let request_id = Uuid::new_v4();
        let start_time = Instant::now();

        info!(
            "[{}] Starting OpenAI request | Model: {} | Messages: {} | max_tokens: {} | temperature: {:.1}",
            request_id,
            self.model,
            payload.message_count(),
            options.max_response_length,
            options.creativity
        );
        debug!(
            "[{}] System prompt length: {} chars",
            request_id,
            payload.system_prompt.len()
        );

        let messages: Vec<ChatCompletionMessage> = payload
            .messages()
            .map(|(role, content)| Self::to_openai_message(role, content))
            .collect();

        let chat_completion_future = ChatCompletion::builder(&self.model, messages)
            .max_tokens(u64::from(options.max_response_length))
            .temperature(options.creativity)
            .create();

        let chat_completion = timeout(self.timeout, chat_completion_future)
            .await
            .map_err(|_| {
                let elapsed = start_time.elapsed();
                error!("[{request_id}] OpenAI request timed out after {elapsed:?}");
                GatewayError::Timeout {
                    secs: self.timeout.as_secs(),
                }
            })?
            .map_err(|e| {
                let elapsed = start_time.elapsed();
                error!("[{request_id}] OpenAI API error after {elapsed:?}: {e}");
                GatewayError::Api(e.to_string())
            })?;

        let elapsed = start_time.elapsed();
        info!("[{request_id}] OpenAI response received after {elapsed:?}");

        let response = chat_completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                error!("[{request_id}] No content in OpenAI response");
                GatewayError::EmptyResponse
            })?;

        debug!(
            "[{}] Reply length: {} chars | Preview: '{}'",
            request_id,
            response.len(),
            response.chars().take(100).collect::<String>()
        );

        Ok(response.to_string())
    }
}
