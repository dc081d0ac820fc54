//! # Feature: Persona Registry
//!
//! Fixed mapping from persona name to system prompt. Four personas ship built in
//! (Neutral, RoastBot, ShakespeareBot, Emoji Translator) with prompts loaded from
//! prompt/*.md at compile time; more can be added from a YAML file at startup.
//! Unknown names resolve to the Neutral persona instead of failing.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Load extra personas from CHAT_PERSONAS_PATH
//! - 1.0.0: Initial release with 4 built-in personas

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::choices::{BUILTIN_PERSONAS, DEFAULT_PERSONA};
use crate::core::ChatError;

/// Used only if the Neutral entry were somehow missing
const FALLBACK_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub system_prompt: String,
    #[serde(default)]
    pub description: String,
}

impl Persona {
    pub fn new(name: &str, description: &str, system_prompt: &str) -> Self {
        Persona {
            name: name.trim().to_string(),
            system_prompt: system_prompt.trim().to_string(),
            description: description.to_string(),
        }
    }
}

/// Root of a persona YAML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonaFile {
    pub personas: Vec<Persona>,
}

impl PersonaFile {
    /// Load extra personas from a YAML file
    pub fn load(path: &str) -> Result<Self, ChatError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatError::Config(format!("cannot read {path}: {e}")))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ChatError> {
        let file: PersonaFile = serde_yaml::from_str(contents)
            .map_err(|e| ChatError::Config(format!("invalid persona file: {e}")))?;
        file.validate()?;
        Ok(file)
    }

    /// Names must be non-empty and unique, prompts non-empty
    pub fn validate(&self) -> Result<(), ChatError> {
        let mut seen = HashSet::new();
        for persona in &self.personas {
            let name = persona.name.trim();
            if name.is_empty() {
                return Err(ChatError::Config("persona name must not be empty".to_string()));
            }
            if persona.system_prompt.trim().is_empty() {
                return Err(ChatError::Config(format!(
                    "persona '{}' has an empty system_prompt",
                    persona.name
                )));
            }
            if !seen.insert(name) {
                return Err(ChatError::Config(format!("persona '{name}' is defined twice")));
            }
        }
        Ok(())
    }
}

/// Read-only registry of personas, kept in registration order
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaRegistry {
    pub fn new() -> Self {
        let personas = BUILTIN_PERSONAS
            .iter()
            .map(|(name, description, prompt)| Persona::new(name, description, prompt))
            .collect();
        PersonaRegistry { personas }
    }

    /// Add personas on top of the built-ins. A persona sharing a name with an
    /// existing entry replaces it in place; new names are appended.
    pub fn with_personas<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = Persona>,
    {
        for mut persona in extra {
            persona.name = persona.name.trim().to_string();
            persona.system_prompt = persona.system_prompt.trim().to_string();
            match self.personas.iter_mut().find(|p| p.name == persona.name) {
                Some(existing) => {
                    info!("Overriding built-in persona '{}'", persona.name);
                    *existing = persona;
                }
                None => {
                    info!("Registered persona '{}'", persona.name);
                    self.personas.push(persona);
                }
            }
        }
        self
    }

    /// System prompt for `name`, or the Neutral prompt when `name` is unknown
    pub fn get(&self, name: &str) -> &str {
        self.get_persona(name)
            .or_else(|| self.get_persona(DEFAULT_PERSONA))
            .map(|p| p.system_prompt.as_str())
            .unwrap_or(FALLBACK_PROMPT)
    }

    pub fn get_persona(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_persona(name).is_some()
    }

    /// `name` if registered, otherwise the default persona name
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        if self.contains(name) {
            name
        } else {
            DEFAULT_PERSONA
        }
    }

    /// Persona names in registration order
    pub fn list(&self) -> Vec<&str> {
        self.personas.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = PersonaRegistry::new();
        assert_eq!(
            registry.list(),
            vec!["Neutral", "RoastBot", "ShakespeareBot", "Emoji Translator"]
        );
    }

    #[test]
    fn test_unknown_name_falls_back_to_neutral() {
        let registry = PersonaRegistry::new();
        assert_eq!(registry.get("nonexistent-name"), registry.get("Neutral"));
        assert_eq!(registry.get(""), registry.get("Neutral"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = PersonaRegistry::new();
        assert!(registry.contains("RoastBot"));
        assert!(!registry.contains("roastbot"));
        assert_eq!(registry.resolve_name("roastbot"), "Neutral");
        assert_eq!(registry.resolve_name("RoastBot"), "RoastBot");
    }

    #[test]
    fn test_prompts_are_distinct_and_trimmed() {
        let registry = PersonaRegistry::new();
        assert!(registry.get("RoastBot").contains("RoastBot"));
        assert!(registry.get("ShakespeareBot").contains("early modern English"));
        assert_ne!(registry.get("RoastBot"), registry.get("Neutral"));
        for persona in registry.personas() {
            assert!(!persona.system_prompt.ends_with('\n'));
        }
    }

    #[test]
    fn test_with_personas_overrides_and_appends() {
        let registry = PersonaRegistry::new().with_personas(vec![
            Persona::new("Neutral", "Terse", "Answer in one sentence.\n"),
            Persona::new("Pirate", "Arr", "Talk like a pirate."),
        ]);
        assert_eq!(
            registry.list(),
            vec!["Neutral", "RoastBot", "ShakespeareBot", "Emoji Translator", "Pirate"]
        );
        assert_eq!(registry.get("Neutral"), "Answer in one sentence.");
        assert_eq!(registry.get("unknown"), "Answer in one sentence.");
        assert_eq!(registry.get("Pirate"), "Talk like a pirate.");
    }

    #[test]
    fn test_persona_file_parse() {
        let yaml = r#"
personas:
  - name: Pirate
    description: Talks like a pirate
    system_prompt: Answer like a pirate would.
  - name: Haiku
    system_prompt: Answer only in haiku.
"#;
        let file = PersonaFile::parse(yaml).unwrap();
        assert_eq!(file.personas.len(), 2);
        assert_eq!(file.personas[1].description, "");
    }

    #[test]
    fn test_persona_file_rejects_duplicates() {
        let yaml = r#"
personas:
  - name: Pirate
    system_prompt: a
  - name: Pirate
    system_prompt: b
"#;
        let err = PersonaFile::parse(yaml).unwrap_err();
        assert!(matches!(err, ChatError::Config(msg) if msg.contains("defined twice")));
    }

    #[test]
    fn test_padded_names_are_trimmed() {
        let yaml = r#"
personas:
  - name: " Pirate "
    system_prompt: Arr.
  - name: " Neutral "
    system_prompt: Answer in one sentence.
"#;
        let file = PersonaFile::parse(yaml).unwrap();
        let registry = PersonaRegistry::new().with_personas(file.personas);

        assert_eq!(
            registry.list(),
            vec!["Neutral", "RoastBot", "ShakespeareBot", "Emoji Translator", "Pirate"]
        );
        assert!(registry.contains("Pirate"));
        assert_eq!(registry.get("Neutral"), "Answer in one sentence.");
        assert_eq!(Persona::new("  Haiku ", "", "x").name, "Haiku");
    }

    #[test]
    fn test_persona_file_rejects_padded_duplicates() {
        let yaml = "personas:\n  - name: Pirate\n    system_prompt: a\n  - name: \" Pirate \"\n    system_prompt: b\n";
        let err = PersonaFile::parse(yaml).unwrap_err();
        assert!(matches!(err, ChatError::Config(msg) if msg.contains("'Pirate' is defined twice")));
    }

    #[test]
    fn test_persona_file_rejects_empty_prompt() {
        let yaml = "personas:\n  - name: Blank\n    system_prompt: \"  \"\n";
        assert!(PersonaFile::parse(yaml).is_err());
    }

    #[test]
    fn test_persona_file_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("personas.yaml");
        std::fs::write(&path, "personas:\n  - name: Pirate\n    system_prompt: Arr.\n").unwrap();

        let file = PersonaFile::load(path.to_str().unwrap()).unwrap();
        assert_eq!(file.personas[0].name, "Pirate");

        let missing = PersonaFile::load(dir.path().join("nope.yaml").to_str().unwrap());
        assert!(missing.is_err());
    }
}
