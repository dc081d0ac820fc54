//! # Personas Feature
//!
//! Named system prompts and request payload composition.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Extra personas from a YAML file
//! - 1.0.0: Initial release

pub mod choices;
pub mod composer;
pub mod manager;

pub use choices::{BUILTIN_PERSONAS, DEFAULT_PERSONA};
pub use composer::{MessageComposer, RequestPayload};
pub use manager::{Persona, PersonaFile, PersonaRegistry};
