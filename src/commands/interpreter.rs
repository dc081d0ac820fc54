//! Control command parsing for raw chat input
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add /clear, /personas, /save and /help
//! - 1.0.0: /persona switching and exit keywords

use crate::features::personas::PersonaRegistry;

/// Prefix that switches persona. Matched case-insensitively, trailing space included.
pub const PERSONA_PREFIX: &str = "/persona ";
pub const EXIT_KEYWORDS: &[&str] = &["quit", "exit", "bye"];

pub const HELP_TEXT: &str = "\
Commands:
  /persona <name>  switch persona mid-chat (history is kept)
  /personas        list available personas
  /clear           clear all memory
  /save [path]     save the conversation (.json paths get JSON)
  /help            show this help
  quit | exit | bye  end the conversation";

/// What a line of user input asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Switch to a registered persona
    SwitchPersona(String),
    /// `/persona` named something unregistered; the active persona stays
    InvalidPersona(String),
    /// Exit keyword: append the farewell turn without calling the gateway
    EndConversation,
    /// Ordinary message, carried verbatim
    Converse(String),
    /// Empty or whitespace-only input
    Noop,
    ClearHistory,
    ListPersonas,
    /// Save the transcript, optionally to a specific path
    ExportTranscript(Option<String>),
    Help,
}

/// Stateless classifier for raw input. Only needs the registry to validate
/// persona names.
pub struct CommandInterpreter<'a> {
    registry: &'a PersonaRegistry,
}

impl<'a> CommandInterpreter<'a> {
    pub fn new(registry: &'a PersonaRegistry) -> Self {
        Self { registry }
    }

    pub fn interpret(&self, raw_input: &str) -> Action {
        let trimmed = raw_input.trim();
        if trimmed.is_empty() {
            return Action::Noop;
        }

        if let Some(rest) = strip_prefix_ignore_case(trimmed, PERSONA_PREFIX) {
            let name = rest.trim();
            return if self.registry.contains(name) {
                Action::SwitchPersona(name.to_string())
            } else {
                Action::InvalidPersona(name.to_string())
            };
        }

        let lowered = trimmed.to_lowercase();
        if EXIT_KEYWORDS.contains(&lowered.as_str()) {
            return Action::EndConversation;
        }

        match lowered.as_str() {
            "/clear" => return Action::ClearHistory,
            "/personas" => return Action::ListPersonas,
            "/help" => return Action::Help,
            "/save" => return Action::ExportTranscript(None),
            _ => {}
        }

        if let Some(path) = strip_prefix_ignore_case(trimmed, "/save ") {
            return Action::ExportTranscript(Some(path.trim().to_string()));
        }

        Action::Converse(raw_input.to_string())
    }
}

/// ASCII case-insensitive `strip_prefix`
fn strip_prefix_ignore_case<'s>(input: &'s str, prefix: &str) -> Option<&'s str> {
    let head = input.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}
