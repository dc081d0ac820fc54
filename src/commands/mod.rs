//! # Command System
//!
//! Control commands typed into the chat input (`/persona`, `/clear`, exit keywords).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod interpreter;

pub use interpreter::{Action, CommandInterpreter, EXIT_KEYWORDS, HELP_TEXT, PERSONA_PREFIX};
