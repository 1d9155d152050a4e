//! One-way copies between the file store and the relational mirror
//!
//! The two sinks are never reconciled automatically. These operations run
//! only when a caller asks for them, always in one direction, and optionally
//! take a backup of the file store first.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::backup::BackupManager;
use crate::error::VaultResult;
use crate::storage::{PromptStore, SkippedRecord};

/// A record that could not be copied
#[derive(Debug, Clone)]
pub struct TransferFailure {
    pub id: String,
    pub name: String,
    pub message: String,
}

/// Outcome of a transfer
#[derive(Debug, Clone, Default)]
pub struct TransferReport {
    /// Backup taken before the transfer, if any
    pub backup: Option<PathBuf>,
    /// Records present in the source
    pub total: usize,
    /// Records written to the destination
    pub copied: usize,
    /// Records left alone because the destination already had them
    pub skipped_existing: usize,
    /// Records the destination rejected
    pub failures: Vec<TransferFailure>,
    /// Source records that could not be read at all
    pub unreadable: Vec<SkippedRecord>,
}

impl TransferReport {
    /// Get a summary of the transfer
    pub fn summary(&self) -> String {
        format!(
            "{} total, {} copied, {} already present, {} failed, {} unreadable",
            self.total,
            self.copied,
            self.skipped_existing,
            self.failures.len(),
            self.unreadable.len()
        )
    }
}

/// Copy every prompt in `source` into `dest`
///
/// With `overwrite` unset, prompts whose identifier already exists in `dest`
/// are left untouched. Per-record failures are collected, not returned.
/// Records written to `dest` are normalized first (version marker, template
/// variables).
pub fn copy_prompts(
    source: &dyn PromptStore,
    dest: &dyn PromptStore,
    overwrite: bool,
    backup: Option<&BackupManager>,
) -> VaultResult<TransferReport> {
    let mut report = TransferReport {
        backup: backup.map(BackupManager::create_backup).transpose()?,
        ..TransferReport::default()
    };

    let listing = source.list()?;
    report.total = listing.items.len();
    report.unreadable = listing.skipped;

    for mut prompt in listing.items {
        if !overwrite {
            match dest.get(&prompt.id) {
                Ok(Some(_)) => {
                    report.skipped_existing += 1;
                    continue;
                }
                Ok(None) => {}
                // An unreadable destination record is replaced only on overwrite
                Err(e) => {
                    report.failures.push(TransferFailure {
                        id: prompt.id.clone(),
                        name: prompt.name.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            }
        }

        prompt.normalize();
        match dest.put(&prompt.id, &prompt) {
            Ok(()) => report.copied += 1,
            Err(e) => {
                warn!(prompt = %prompt.id, error = %e, "failed to transfer prompt");
                report.failures.push(TransferFailure {
                    id: prompt.id.clone(),
                    name: prompt.name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        total = report.total,
        copied = report.copied,
        failed = report.failures.len(),
        "transfer finished"
    );
    Ok(report)
}

/// Export every file-store prompt into the mirror, overwriting mirror rows
pub fn export_to_mirror(
    files: &dyn PromptStore,
    mirror: &dyn PromptStore,
    backup: Option<&BackupManager>,
) -> VaultResult<TransferReport> {
    copy_prompts(files, mirror, true, backup)
}

/// Import every mirror row into the file store
///
/// Existing prompt files are kept unless `overwrite` is set.
pub fn import_from_mirror(
    mirror: &dyn PromptStore,
    files: &dyn PromptStore,
    overwrite: bool,
    backup: Option<&BackupManager>,
) -> VaultResult<TransferReport> {
    copy_prompts(mirror, files, overwrite, backup)
}
