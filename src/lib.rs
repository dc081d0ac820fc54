// Core layer - configuration and error types
pub mod core;

// Features layer - personas, conversation history, reply gateway
pub mod features;

// Application layer
pub mod commands;
pub mod session;

pub use self::core::{ChatError, Config};

pub use features::{
    // Conversation
    ConversationHistory, Role, Turn,
    // Personas
    MessageComposer, Persona, PersonaRegistry, RequestPayload,
    // Reply
    GatewayError, OpenAiGateway, ReplyGateway, ReplyOptions,
};

pub use commands::{Action, CommandInterpreter};
pub use session::{Outcome, Session};
