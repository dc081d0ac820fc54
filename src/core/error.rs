//! Error kinds surfaced by the chat core
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use thiserror::Error;

use crate::features::reply::GatewayError;

/// Everything the session can report back to the user.
///
/// `MissingCredential` and `Config` stop startup; the rest are rendered and
/// the conversation carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// `/persona <name>` named something the registry does not know
    #[error("No persona named '{name}'. Available: {}", .available.join(", "))]
    InvalidPersona { name: String, available: Vec<String> },

    /// The reply service failed for any reason
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// Required credential is absent at startup
    #[error("{0} is not set. Put it in a .env file in the working directory.")]
    MissingCredential(String),

    /// Persona file or other startup configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_persona_lists_available() {
        let err = ChatError::InvalidPersona {
            name: "Nonsense".to_string(),
            available: vec!["Neutral".to_string(), "RoastBot".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No persona named 'Nonsense'. Available: Neutral, RoastBot"
        );
    }

    #[test]
    fn test_missing_credential_message() {
        let err = ChatError::MissingCredential("OPENAI_API_KEY".to_string());
        assert!(err.to_string().starts_with("OPENAI_API_KEY is not set"));
    }

    #[test]
    fn test_gateway_error_passes_description_through() {
        let err: ChatError = GatewayError::Api("quota exceeded".to_string()).into();
        assert_eq!(err, ChatError::Gateway(GatewayError::Api("quota exceeded".to_string())));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
