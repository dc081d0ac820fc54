//! Request payload composition
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use super::PersonaRegistry;
use crate::features::conversation::{Role, Turn};

/// Persona prompt plus history, rebuilt for every request and never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    pub system_prompt: String,
    pub turns: Vec<Turn>,
}

impl RequestPayload {
    /// All messages in wire order: the system prompt first, then the turns
    pub fn messages(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        std::iter::once((Role::System, self.system_prompt.as_str()))
            .chain(self.turns.iter().map(|turn| (turn.role(), turn.content())))
    }

    pub fn message_count(&self) -> usize {
        self.turns.len() + 1
    }
}

/// Builds request payloads from a persona name and a history snapshot.
///
/// # Example
///
/// ```ignore
/// let payload = MessageComposer::new(&registry).build("RoastBot", history.snapshot());
/// ```
pub struct MessageComposer<'a> {
    registry: &'a PersonaRegistry,
}

impl<'a> MessageComposer<'a> {
    pub fn new(registry: &'a PersonaRegistry) -> Self {
        Self { registry }
    }

    /// Pure: unknown personas resolve to Neutral and the turns are copied as-is
    pub fn build(&self, persona_name: &str, history: &[Turn]) -> RequestPayload {
        RequestPayload {
            system_prompt: self.registry.get(persona_name).to_string(),
            turns: history.to_vec(),
        }
    }
}
