//! Core data models for prompt-vault
//!
//! A `Prompt` is the one persisted record type. Both the file store and the
//! relational mirror read and write it.

pub mod prompt;
pub mod template;

pub use prompt::{Prompt, PromptSummary};
pub use template::{extract_variables, slugify};
