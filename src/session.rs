//! # Chat Session
//!
//! Owns the history and active persona of one conversation and runs exactly
//! one user action per call: interpret → (append user turn → compose → send →
//! append assistant turn).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use log::{debug, info, warn};
use std::path::Path;

use crate::commands::{Action, CommandInterpreter, HELP_TEXT};
use crate::core::ChatError;
use crate::features::conversation::{transcript, ConversationHistory, Role, TranscriptFormat, Turn};
use crate::features::personas::{MessageComposer, PersonaRegistry};
use crate::features::reply::{ReplyGateway, ReplyOptions};

pub const FAREWELL: &str = "Bye! If you want to chat again, send a new message.";

/// Text of the assistant turn that stands in for a failed reply
pub fn error_reply(description: &str) -> String {
    format!("[Error getting reply: {description}]")
}

/// Result of one `Session::handle` call, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Noop,
    PersonaSwitched(String),
    PersonaRejected(ChatError),
    /// Farewell turn appended; the gateway was not called
    Farewell(String),
    /// Assistant turn appended. `error` is set when `text` is an error placeholder.
    Replied { text: String, error: Option<ChatError> },
    Cleared,
    /// (name, description) pairs in registration order
    Personas(Vec<(String, String)>),
    ExportRequested(Option<String>),
    Help(&'static str),
}

pub struct Session {
    registry: PersonaRegistry,
    persona: String,
    history: ConversationHistory,
    options: ReplyOptions,
}

impl Session {
    /// Start an empty session. Unknown persona names fall back to Neutral.
    pub fn new(registry: PersonaRegistry, persona: &str, options: ReplyOptions) -> Self {
        let resolved = registry.resolve_name(persona).to_string();
        if resolved != persona {
            warn!("Unknown persona '{persona}', starting with '{resolved}'");
        }
        Session {
            registry,
            persona: resolved,
            history: ConversationHistory::new(),
            options,
        }
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn active_persona(&self) -> &str {
        &self.persona
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn options(&self) -> &ReplyOptions {
        &self.options
    }

    /// (role, content) of every turn, oldest first
    pub fn render(&self) -> Vec<(Role, &str)> {
        self.history
            .snapshot()
            .iter()
            .map(|turn| (turn.role(), turn.content()))
            .collect()
    }

    /// Plain-text transcript of the whole history
    pub fn transcript(&self) -> String {
        transcript::render_text(self.history.snapshot())
    }

    /// Save the history to disk; `.json` paths get JSON, anything else plain text
    pub async fn save_transcript(&self, path: &Path) -> anyhow::Result<TranscriptFormat> {
        transcript::save(self.history.snapshot(), path).await
    }

    pub fn clear(&mut self) {
        self.history.clear();
        info!("Conversation memory cleared");
    }

    /// Process one line of user input to completion
    pub async fn handle(&mut self, raw_input: &str, gateway: &dyn ReplyGateway) -> Outcome {
        let action = CommandInterpreter::new(&self.registry).interpret(raw_input);
        debug!("Interpreted input as {action:?}");

        match action {
            Action::Noop => Outcome::Noop,
            Action::SwitchPersona(name) => {
                info!("Persona switched: {} -> {}", self.persona, name);
                self.persona = name.clone();
                Outcome::PersonaSwitched(name)
            }
            Action::InvalidPersona(name) => {
                warn!("Rejected unknown persona '{name}'");
                Outcome::PersonaRejected(ChatError::InvalidPersona {
                    name,
                    available: self.registry.list().into_iter().map(String::from).collect(),
                })
            }
            Action::EndConversation => {
                self.history.append(Turn::assistant(FAREWELL));
                Outcome::Farewell(FAREWELL.to_string())
            }
            Action::Converse(text) => self.converse(text, gateway).await,
            Action::ClearHistory => {
                self.clear();
                Outcome::Cleared
            }
            Action::ListPersonas => Outcome::Personas(
                self.registry
                    .personas()
                    .iter()
                    .map(|p| (p.name.clone(), p.description.clone()))
                    .collect(),
            ),
            Action::ExportTranscript(path) => Outcome::ExportRequested(path),
            Action::Help => Outcome::Help(HELP_TEXT),
        }
    }

    /// Normal turn cycle. Always appends two turns: the user message and
    /// either the reply or an error placeholder.
    async fn converse(&mut self, text: String, gateway: &dyn ReplyGateway) -> Outcome {
        self.history.append(Turn::user(text));

        let payload = MessageComposer::new(&self.registry).build(&self.persona, self.history.snapshot());
        let (reply, error) = match gateway.send(&payload, &self.options).await {
            Ok(reply) => (reply, None),
            Err(e) => {
                let error = ChatError::from(e);
                warn!("Reply failed, recording error turn: {error}");
                (error_reply(&error.to_string()), Some(error))
            }
        };

        self.history.append(Turn::assistant(reply.clone()));
        Outcome::Replied { text: reply, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::personas::RequestPayload;
    use crate::features::reply::GatewayError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned results and records every payload it receives
    struct ScriptedGateway {
        replies: Mutex<Vec<Result<String, GatewayError>>>,
        seen: Mutex<Vec<RequestPayload>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
            ScriptedGateway {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn last_payload(&self) -> RequestPayload {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ReplyGateway for ScriptedGateway {
        async fn send(
            &self,
            payload: &RequestPayload,
            _options: &ReplyOptions,
        ) -> Result<String, GatewayError> {
            self.seen.lock().unwrap().push(payload.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GatewayError::EmptyResponse))
        }
    }

    fn session() -> Session {
        Session::new(PersonaRegistry::new(), "Neutral", ReplyOptions::default())
    }

    #[tokio::test]
    async fn test_converse_appends_user_and_reply() {
        let gateway = ScriptedGateway::new(vec![Ok("Hi there!".to_string())]);
        let mut session = session();

        let outcome = session.handle("Hello", &gateway).await;

        assert_eq!(outcome, Outcome::Replied { text: "Hi there!".to_string(), error: None });
        assert_eq!(
            session.history().snapshot(),
            &[Turn::user("Hello"), Turn::assistant("Hi there!")]
        );
        let payload = gateway.last_payload();
        assert_eq!(payload.system_prompt, session.registry().get("Neutral"));
        assert_eq!(payload.turns, vec![Turn::user("Hello")]);
    }

    #[tokio::test]
    async fn test_gateway_error_becomes_assistant_turn() {
        let gateway = ScriptedGateway::new(vec![Err(GatewayError::Api("timeout".to_string()))]);
        let mut session = session();

        let outcome = session.handle("Hello", &gateway).await;

        assert!(matches!(
            outcome,
            Outcome::Replied { error: Some(ChatError::Gateway(GatewayError::Api(_))), .. }
        ));
        assert_eq!(session.history().len(), 2);
        let last = session.history().last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert!(last.content().contains("timeout"));
        assert!(last.content().starts_with("[Error getting reply:"));
    }

    #[tokio::test]
    async fn test_conversation_continues_after_error() {
        let gateway = ScriptedGateway::new(vec![
            Err(GatewayError::Timeout { secs: 45 }),
            Ok("Back online".to_string()),
        ]);
        let mut session = session();

        session.handle("first", &gateway).await;
        let outcome = session.handle("second", &gateway).await;

        assert_eq!(outcome, Outcome::Replied { text: "Back online".to_string(), error: None });
        assert_eq!(session.history().len(), 4);
        // The error placeholder is part of the context sent next time
        assert_eq!(gateway.last_payload().turns.len(), 3);
    }

    #[tokio::test]
    async fn test_exit_keyword_appends_only_farewell() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut session = session();

        let outcome = session.handle("  Bye ", &gateway).await;

        assert_eq!(outcome, Outcome::Farewell(FAREWELL.to_string()));
        assert_eq!(session.history().snapshot(), &[Turn::assistant(FAREWELL)]);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_switch_persona_keeps_history() {
        let gateway = ScriptedGateway::new(vec![Ok("one".to_string()), Ok("two".to_string())]);
        let mut session = session();

        session.handle("Hello", &gateway).await;
        let outcome = session.handle("/persona RoastBot", &gateway).await;
        assert_eq!(outcome, Outcome::PersonaSwitched("RoastBot".to_string()));
        assert_eq!(session.active_persona(), "RoastBot");
        assert_eq!(session.history().len(), 2);

        session.handle("Roast me", &gateway).await;
        let payload = gateway.last_payload();
        assert_eq!(payload.system_prompt, session.registry().get("RoastBot"));
        assert_eq!(payload.turns.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_persona_leaves_state_unchanged() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut session = session();

        let outcome = session.handle("/persona Nonsense", &gateway).await;

        match outcome {
            Outcome::PersonaRejected(err) => {
                assert!(err.to_string().contains("No persona named 'Nonsense'"));
                assert!(err.to_string().contains("RoastBot"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(session.active_persona(), "Neutral");
        assert!(session.history().is_empty());
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_noop_and_clear() {
        let gateway = ScriptedGateway::new(vec![Ok("reply".to_string())]);
        let mut session = session();

        assert_eq!(session.handle("   ", &gateway).await, Outcome::Noop);
        assert!(session.history().is_empty());

        session.handle("Hello", &gateway).await;
        assert_eq!(session.handle("/clear", &gateway).await, Outcome::Cleared);
        assert!(session.history().snapshot().is_empty());
        assert_eq!(session.active_persona(), "Neutral");
    }

    #[tokio::test]
    async fn test_list_help_and_export_do_not_touch_history() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut session = session();

        match session.handle("/personas", &gateway).await {
            Outcome::Personas(list) => {
                assert_eq!(list.len(), 4);
                assert_eq!(list[0].0, "Neutral");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(session.handle("/help", &gateway).await, Outcome::Help(HELP_TEXT));
        assert_eq!(
            session.handle("/save out.txt", &gateway).await,
            Outcome::ExportRequested(Some("out.txt".to_string()))
        );
        assert!(session.history().is_empty());
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_unknown_start_persona_falls_back() {
        let session = Session::new(PersonaRegistry::new(), "Ghost", ReplyOptions::default());
        assert_eq!(session.active_persona(), "Neutral");
    }

    #[tokio::test]
    async fn test_render_and_transcript() {
        let gateway = ScriptedGateway::new(vec![Ok("Hello!".to_string())]);
        let mut session = session();
        session.handle("Hi", &gateway).await;

        assert_eq!(session.render(), vec![(Role::User, "Hi"), (Role::Assistant, "Hello!")]);
        assert_eq!(session.transcript(), "You: Hi\n\nChatbot: Hello!");
    }
}
