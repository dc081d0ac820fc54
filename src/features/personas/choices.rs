//! Built-in persona table
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

/// Persona every unknown name falls back to
pub const DEFAULT_PERSONA: &str = "Neutral";

/// Built-in personas in presentation order: (name, description, system prompt)
pub const BUILTIN_PERSONAS: &[(&str, &str, &str)] = &[
    (
        DEFAULT_PERSONA,
        "Polite and helpful, clear and concise answers",
        include_str!("../../../prompt/neutral.md"),
    ),
    (
        "RoastBot",
        "Sarcastic, witty and playful, never abusive",
        include_str!("../../../prompt/roastbot.md"),
    ),
    (
        "ShakespeareBot",
        "Answers in poetic early modern English",
        include_str!("../../../prompt/shakespeare.md"),
    ),
    (
        "Emoji Translator",
        "Turns your message into emojis",
        include_str!("../../../prompt/emoji.md"),
    ),
];
