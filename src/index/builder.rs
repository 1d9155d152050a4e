//! Index builder
//!
//! Reads the records directory file by file as raw JSON, so a document that
//! does not even deserialize as a `Prompt` costs only its own entry.

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{VaultError, VaultResult};
use crate::storage::{
    read_json, write_json_atomic, PromptRepository, ScanReport, SkipReason, SkippedRecord,
};

use super::{IndexEntry, IndexMetadata, PromptIndex, INDEX_FILE_NAME, INDEX_FORMAT_VERSION};

/// Fields a stored document must carry to appear in the index
pub const REQUIRED_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "content",
    "isTemplate",
    "tags",
    "version",
];

/// Outcome of an index build
#[derive(Debug, Clone)]
pub struct IndexBuildReport {
    /// Where the index was written
    pub path: PathBuf,
    /// The index as written
    pub index: PromptIndex,
    /// Records left out of the index
    pub skipped: Vec<SkippedRecord>,
}

impl IndexBuildReport {
    /// Number of prompts in the index
    pub fn total(&self) -> usize {
        self.index.metadata.total_prompts
    }
}

/// Regenerates `index.json` from the prompt files
pub struct IndexBuilder {
    repository: PromptRepository,
}

impl IndexBuilder {
    /// Create a builder over the given record store
    pub fn new(repository: PromptRepository) -> Self {
        Self { repository }
    }

    /// Path of the index artifact
    pub fn index_path(&self) -> PathBuf {
        self.repository.root().join(INDEX_FILE_NAME)
    }

    /// Scan, validate, project and sort every prompt without writing anything
    pub fn collect(&self) -> VaultResult<ScanReport<IndexEntry>> {
        let ScanReport { items, mut skipped } = self.repository.scan_documents()?;
        let mut entries = Vec::with_capacity(items.len());

        for raw in items {
            match project_entry(&raw.key, raw.document) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    warn!(prompt = %raw.key, %reason, "excluding prompt from index");
                    skipped.push(SkippedRecord::new(raw.key, reason));
                }
            }
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(ScanReport {
            items: entries,
            skipped,
        })
    }

    /// Rebuild `index.json`
    ///
    /// Per-record problems never fail the build; the index reflects however
    /// many valid prompts were found, including none.
    pub fn build(&self) -> VaultResult<IndexBuildReport> {
        let ScanReport { items, skipped } = self.collect()?;

        let index = PromptIndex {
            metadata: IndexMetadata {
                total_prompts: items.len(),
                last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                version: INDEX_FORMAT_VERSION.to_string(),
            },
            prompts: items,
        };

        let path = self.index_path();
        write_json_atomic(&path, &index)?;

        info!(
            total = index.metadata.total_prompts,
            skipped = skipped.len(),
            path = %path.display(),
            "rebuilt prompt index"
        );

        Ok(IndexBuildReport {
            path,
            index,
            skipped,
        })
    }

    /// Read the index written by the last build
    pub fn load(&self) -> VaultResult<PromptIndex> {
        read_json(self.index_path(), INDEX_FILE_NAME)?.ok_or_else(|| VaultError::NotFound {
            entity_type: "Index",
            identifier: self.index_path().display().to_string(),
        })
    }
}

/// Project one parsed prompt document to an index entry
///
/// Inclusion is decided by which fields are present; `description` may be
/// `null`.
fn project_entry(key: &str, document: Value) -> Result<IndexEntry, SkipReason> {
    let Value::Object(fields) = document else {
        return Err(SkipReason::Parse(format!("{} is not a JSON object", key)));
    };

    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|f| !fields.contains_key(*f))
    {
        return Err(SkipReason::MissingField(missing));
    }

    let text = |field: &'static str| -> Result<String, SkipReason> {
        match &fields[field] {
            Value::String(s) => Ok(s.clone()),
            other => Err(SkipReason::Parse(format!(
                "'{}' must be a string, found {}",
                field, other
            ))),
        }
    };

    let tags = serde_json::from_value::<Vec<String>>(fields["tags"].clone())
        .map_err(|e| SkipReason::Parse(format!("'tags': {}", e)))?;
    let is_template = fields["isTemplate"]
        .as_bool()
        .ok_or_else(|| SkipReason::Parse("'isTemplate' must be a boolean".into()))?;
    let metadata = match fields.get("metadata") {
        Some(Value::Object(map)) => map.clone(),
        _ => serde_json::Map::new(),
    };

    Ok(IndexEntry {
        id: text("id")?,
        name: text("name")?,
        description: match &fields["description"] {
            Value::Null => None,
            _ => Some(text("description")?),
        },
        tags,
        is_template,
        metadata,
    })
}
