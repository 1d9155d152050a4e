//! Storage layer for prompt-vault
//!
//! Provides the `PromptStore` interface shared by both sinks, and the
//! file-backed implementation: one JSON document per prompt, written
//! atomically, with automatic directory creation.

pub mod file_io;
pub mod prompts;
pub mod report;

pub use file_io::{read_json, write_json_atomic};
pub use prompts::{validate_identifier, PromptRepository, RawDocument, StoredPrompt};
pub use report::{ScanReport, SkipReason, SkippedRecord};

use crate::error::VaultResult;
use crate::models::Prompt;

/// The narrow interface every prompt sink implements
///
/// Callers choose a sink; the file store and the relational mirror are never
/// reconciled behind this interface.
pub trait PromptStore {
    /// Insert or overwrite the prompt stored under `id`
    fn put(&self, id: &str, prompt: &Prompt) -> VaultResult<()>;

    /// Fetch a prompt, `Ok(None)` if nothing is stored under `id`
    fn get(&self, id: &str) -> VaultResult<Option<Prompt>>;

    /// Every readable prompt, plus the records that had to be skipped
    fn list(&self) -> VaultResult<ScanReport<Prompt>>;

    /// Remove a prompt, returning whether one was present
    fn delete(&self, id: &str) -> VaultResult<bool>;
}
