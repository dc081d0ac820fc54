//! # Reply Feature
//!
//! Boundary to the remote text-generation service.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod gateway;

pub use gateway::{GatewayError, OpenAiGateway, ReplyGateway, ReplyOptions};
