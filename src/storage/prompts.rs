//! Prompt repository for JSON file storage
//!
//! Stores each prompt as `<root>/<id>.json`. The directory is the source of
//! truth; nothing is cached in memory, so every call sees the files as they
//! are on disk right now.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{VaultError, VaultResult};
use crate::index::INDEX_FILE_NAME;
use crate::models::Prompt;

use super::file_io::{is_json_file, read_json, write_json_atomic};
use super::report::{ScanReport, SkipReason, SkippedRecord};
use super::PromptStore;

/// File stems that belong to derived artifacts, never to prompts
const RESERVED_IDS: &[&str] = &["index", "manifest"];

/// A prompt read from disk together with where it came from
#[derive(Debug, Clone)]
pub struct StoredPrompt {
    /// File stem the prompt is stored under
    pub key: String,
    /// Full path of the prompt file
    pub path: PathBuf,
    /// The parsed prompt
    pub prompt: Prompt,
}

/// Repository for prompt persistence in a directory of JSON files
/// A prompt file that parsed as JSON, whatever its shape
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// File stem the document is stored under
    pub key: String,
    /// Full path of the file
    pub path: PathBuf,
    /// The parsed document
    pub document: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct PromptRepository {
    root: PathBuf,
}

impl PromptRepository {
    /// Create a repository over `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The live records directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `id`
    pub fn record_path(&self, id: &str) -> VaultResult<PathBuf> {
        validate_identifier(id)?;
        Ok(self.root.join(format!("{}.json", id)))
    }

    /// Whether a file exists for `id`
    pub fn exists(&self, id: &str) -> VaultResult<bool> {
        Ok(self.record_path(id)?.is_file())
    }

    /// Read every prompt file, skipping the ones that cannot be parsed
    ///
    /// Results are ordered by storage key. A missing root directory is an
    /// empty store, not an error.
    pub fn scan(&self) -> VaultResult<ScanReport<StoredPrompt>> {
        let mut report = ScanReport::default();

        for path in self.record_files()? {
            let Some(key) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };

            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(prompt = %key, error = %e, "skipping unreadable prompt file");
                    report
                        .skipped
                        .push(SkippedRecord::new(key, SkipReason::Read(e.to_string())));
                    continue;
                }
            };

            match serde_json::from_str::<Prompt>(&contents) {
                Ok(mut prompt) => {
                    if prompt.id.is_empty() {
                        prompt.id = key.clone();
                    }
                    report.items.push(StoredPrompt { key, path, prompt });
                }
                Err(e) => {
                    warn!(prompt = %key, error = %e, "skipping invalid prompt file");
                    report
                        .skipped
                        .push(SkippedRecord::new(key, SkipReason::Parse(e.to_string())));
                }
            }
        }

        report.items.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(report)
    }

    /// Read every prompt file as raw JSON, skipping only unreadable or
    /// unparseable files
    ///
    /// Results are ordered by storage key.
    pub fn scan_documents(&self) -> VaultResult<ScanReport<RawDocument>> {
        let mut report = ScanReport::default();

        for path in self.record_files()? {
            let Some(key) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };

            let parsed = fs::read_to_string(&path)
                .map_err(|e| SkipReason::Read(e.to_string()))
                .and_then(|contents| {
                    serde_json::from_str::<serde_json::Value>(&contents)
                        .map_err(|e| SkipReason::Parse(e.to_string()))
                });

            match parsed {
                Ok(document) => report.items.push(RawDocument {
                    key,
                    path,
                    document,
                }),
                Err(reason) => {
                    warn!(prompt = %key, %reason, "skipping unparseable prompt file");
                    report.skipped.push(SkippedRecord::new(key, reason));
                }
            }
        }

        Ok(report)
    }

    /// Paths of every candidate prompt file under the root
    pub(crate) fn record_files(&self) -> VaultResult<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| {
            VaultError::Io(format!(
                "Failed to read prompts directory {}: {}",
                self.root.display(),
                e
            ))
        })? {
            let path = entry
                .map_err(|e| VaultError::Io(format!("Failed to read directory entry: {}", e)))?
                .path();

            if is_json_file(&path) && path.file_name().is_some_and(|n| n != INDEX_FILE_NAME) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Number of prompt files that parse
    pub fn count(&self) -> VaultResult<usize> {
        Ok(self.scan()?.items.len())
    }
}

impl PromptStore for PromptRepository {
    fn put(&self, id: &str, prompt: &Prompt) -> VaultResult<()> {
        let path = self.record_path(id)?;
        write_json_atomic(&path, prompt)?;
        debug!(prompt = %id, path = %path.display(), "wrote prompt");
        Ok(())
    }

    fn get(&self, id: &str) -> VaultResult<Option<Prompt>> {
        let path = self.record_path(id)?;
        let prompt: Option<Prompt> = read_json(&path, id)?;

        Ok(prompt.map(|mut p| {
            if p.id.is_empty() {
                p.id = id.to_string();
            }
            p
        }))
    }

    fn list(&self) -> VaultResult<ScanReport<Prompt>> {
        Ok(self.scan()?.map(|stored| stored.prompt))
    }

    fn delete(&self, id: &str) -> VaultResult<bool> {
        let path = self.record_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(prompt = %id, "deleted prompt");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VaultError::Io(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Check that `id` can be used as a file stem in the records directory
pub fn validate_identifier(id: &str) -> VaultResult<()> {
    if id.trim().is_empty() {
        return Err(VaultError::Validation("Prompt id cannot be empty".into()));
    }
    if id == "." || id == ".." || id.contains(['/', '\\']) || id.contains('\0') {
        return Err(VaultError::Validation(format!(
            "Prompt id '{}' is not a valid file name",
            id
        )));
    }
    if RESERVED_IDS.contains(&id) {
        return Err(VaultError::Validation(format!(
            "Prompt id '{}' is reserved",
            id
        )));
    }
    Ok(())
}
