//! # Conversation Feature
//!
//! Linear user/assistant history for one session, plus transcript export.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: JSON transcript export for `.json` paths
//! - 1.0.0: Initial release

pub mod history;
pub mod transcript;

pub use history::{ConversationHistory, Role, Turn};
pub use transcript::{render_text, speaker_label, TranscriptFormat};
