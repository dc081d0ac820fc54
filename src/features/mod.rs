//! # Features
//!
//! Domain modules behind the chat session.

pub mod conversation;
pub mod personas;
pub mod reply;

pub use conversation::{ConversationHistory, Role, Turn};
pub use personas::{MessageComposer, Persona, PersonaRegistry, RequestPayload};
pub use reply::{GatewayError, OpenAiGateway, ReplyGateway, ReplyOptions};
