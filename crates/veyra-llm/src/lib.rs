//! Chat-completions client used to generate narrative text.

pub mod client;
pub mod error;

pub use client::{ChatMessage, GenerationParams, LlmClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::LlmError;
