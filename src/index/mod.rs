//! Derived prompt index
//!
//! `index.json` at the records root summarises every well-formed prompt. It
//! is never edited in place: each build rescans the directory and rewrites
//! the whole file.
//!
//! # Format
//!
//! ```json
//! {
//!   "prompts": [{ "id", "name", "description", "tags", "isTemplate", "metadata" }],
//!   "metadata": { "totalPrompts", "lastUpdated", "version" }
//! }
//! ```

mod builder;

pub use builder::{IndexBuildReport, IndexBuilder, REQUIRED_FIELDS};

use serde::{Deserialize, Serialize};

/// File name of the index artifact inside the records root
pub const INDEX_FILE_NAME: &str = "index.json";

/// Format version written into every index
pub const INDEX_FORMAT_VERSION: &str = "1.0";

/// Read-only projection of a well-formed prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    /// `None` when the stored description is `null`
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_template: bool,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Build metadata stored alongside the entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    pub total_prompts: usize,
    pub last_updated: String,
    pub version: String,
}

/// The complete `index.json` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptIndex {
    pub prompts: Vec<IndexEntry>,
    pub metadata: IndexMetadata,
}
