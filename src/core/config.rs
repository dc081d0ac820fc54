//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::error::ChatError;
use crate::features::personas::DEFAULT_PERSONA;
use crate::features::reply::ReplyOptions;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TRANSCRIPT_PATH: &str = "conversation.txt";
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `LOG_LEVEL` from the process environment. Read on its own so the logger
/// can be installed before the rest of the configuration is parsed.
pub fn log_level_from_env() -> String {
    log_level(|key| env::var(key).ok())
}

fn log_level<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup("LOG_LEVEL")).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub log_level: String,
    /// Persona active when the session starts
    pub persona: String,
    pub reply_options: ReplyOptions,
    /// Optional YAML file with extra personas
    pub personas_path: Option<String>,
    pub transcript_path: String,
    pub timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ChatError::MissingCredential("OPENAI_API_KEY".to_string()))?;

        let openai_model = non_empty(lookup("OPENAI_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let log_level = log_level(&lookup);
        let persona = non_empty(lookup("CHAT_PERSONA")).unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        let max_response_length = parse_or(
            "CHAT_MAX_TOKENS",
            lookup("CHAT_MAX_TOKENS"),
            ReplyOptions::DEFAULT_MAX_RESPONSE_LENGTH,
        );
        let creativity = parse_or(
            "CHAT_TEMPERATURE",
            lookup("CHAT_TEMPERATURE"),
            ReplyOptions::DEFAULT_CREATIVITY,
        );
        let timeout_secs = parse_or("CHAT_TIMEOUT_SECS", lookup("CHAT_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS);

        Ok(Config {
            openai_api_key,
            openai_model,
            log_level,
            persona,
            reply_options: ReplyOptions::clamped(max_response_length, creativity),
            personas_path: non_empty(lookup("CHAT_PERSONAS_PATH")),
            transcript_path: non_empty(lookup("CHAT_TRANSCRIPT_PATH"))
                .unwrap_or_else(|| DEFAULT_TRANSCRIPT_PATH.to_string()),
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match non_empty(value) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {key}={raw:?}, using default");
            default
        }),
        None => default,
    }
}
