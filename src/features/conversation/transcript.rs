//! Plain-text and JSON export of a conversation
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use log::info;
use std::path::Path;

use super::history::{Role, Turn};

pub const USER_LABEL: &str = "You";
pub const ASSISTANT_LABEL: &str = "Chatbot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Text,
    Json,
}

impl TranscriptFormat {
    /// `.json` paths get JSON, everything else plain text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TranscriptFormat::Json,
            _ => TranscriptFormat::Text,
        }
    }
}

/// Display label for a turn's speaker
pub fn speaker_label(role: Role) -> &'static str {
    match role {
        Role::User => USER_LABEL,
        _ => ASSISTANT_LABEL,
    }
}

/// `"<You|Chatbot>: <content>"` per turn, separated by a blank line
pub fn render_text(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", speaker_label(turn.role()), turn.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pretty-printed JSON array of `{role, content}` objects
pub fn render_json(turns: &[Turn]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(turns)
}

pub fn render(turns: &[Turn], format: TranscriptFormat) -> serde_json::Result<String> {
    match format {
        TranscriptFormat::Text => Ok(render_text(turns)),
        TranscriptFormat::Json => render_json(turns),
    }
}

/// Write the transcript to `path`, choosing the format from its extension
pub async fn save(turns: &[Turn], path: &Path) -> Result<TranscriptFormat> {
    let format = TranscriptFormat::from_path(path);
    let contents = render(turns, format)?;
    tokio::fs::write(path, contents).await?;
    info!("Saved {} turns to {} ({format:?})", turns.len(), path.display());
    Ok(format)
}
