//! Backup restoration for prompt-vault
//!
//! Copies a snapshot's prompt files back into the live directory. Restore
//! merges: live prompts missing from the snapshot are left alone, and
//! prompts present in both are overwritten with the snapshot copy.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::paths::VaultPaths;
use crate::error::{VaultError, VaultResult};
use crate::index::INDEX_FILE_NAME;
use crate::storage::{file_io::is_json_file, read_json, PromptRepository};

use super::manager::{snapshot_path, BackupManager, Manifest, MANIFEST_FILE_NAME};

/// Handles restoring from snapshots
pub struct RestoreManager {
    repository: PromptRepository,
    backup_dir: PathBuf,
}

impl RestoreManager {
    /// Create a manager restoring from `backup_dir` into `repository`
    pub fn new(repository: PromptRepository, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            backup_dir: backup_dir.into(),
        }
    }

    /// Create a manager for the configured directories
    pub fn from_paths(paths: &VaultPaths) -> Self {
        Self::new(
            PromptRepository::new(paths.prompts_dir()),
            paths.backup_dir(),
        )
    }

    /// Restore every prompt file in the snapshot named `timestamp`
    ///
    /// Fails with `NotFound` before touching the live store if the snapshot
    /// does not exist.
    pub fn restore_from_backup(&self, timestamp: &str) -> VaultResult<RestoreResult> {
        let snapshot_dir = snapshot_path(&self.backup_dir, timestamp)?;
        if !snapshot_dir.is_dir() {
            return Err(VaultError::backup_not_found(timestamp));
        }

        let files = self.snapshot_files(&snapshot_dir)?;

        let live_dir = self.repository.root();
        fs::create_dir_all(live_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create prompts directory: {}", e)))?;

        let mut restored = Vec::with_capacity(files.len());
        for (name, src) in files {
            fs::copy(&src, live_dir.join(&name))
                .map_err(|e| VaultError::Io(format!("Failed to restore {}: {}", name, e)))?;
            restored.push(record_id(&name));
        }

        info!(backup = %timestamp, count = restored.len(), "restored backup");

        Ok(RestoreResult {
            timestamp: timestamp.to_string(),
            success: true,
            count: restored.len(),
            restored,
        })
    }

    /// Restore the newest snapshot
    pub fn restore_latest(&self) -> VaultResult<RestoreResult> {
        let latest = BackupManager::new(self.repository.clone(), self.backup_dir.clone())
            .get_latest_backup()?
            .ok_or_else(|| VaultError::backup_not_found("latest"))?;
        self.restore_from_backup(&latest.timestamp)
    }

    /// Compare a snapshot's manifest with the files it actually holds
    pub fn verify_backup(&self, timestamp: &str) -> VaultResult<BackupVerification> {
        let snapshot_dir = snapshot_path(&self.backup_dir, timestamp)?;
        if !snapshot_dir.is_dir() {
            return Err(VaultError::backup_not_found(timestamp));
        }

        let present: BTreeSet<String> = self
            .snapshot_files(&snapshot_dir)?
            .into_iter()
            .map(|(name, _)| record_id(&name))
            .collect();

        let manifest = match read_json::<Manifest, _>(
            snapshot_dir.join(MANIFEST_FILE_NAME),
            timestamp,
        ) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(backup = %timestamp, error = %e, "backup manifest is unreadable");
                None
            }
        };

        let missing = manifest
            .as_ref()
            .map(|m| {
                m.prompts
                    .iter()
                    .filter(|p| !present.contains(&p.id))
                    .map(|p| p.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        Ok(BackupVerification {
            timestamp: timestamp.to_string(),
            manifest,
            files: present.len(),
            missing,
        })
    }

    /// Prompt files in a snapshot as (file name, path), sorted by name
    fn snapshot_files(&self, snapshot_dir: &Path) -> VaultResult<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(snapshot_dir)
            .map_err(|e| VaultError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let path = entry
                .map_err(|e| VaultError::Io(format!("Failed to read directory entry: {}", e)))?
                .path();

            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if is_json_file(&path) && name != MANIFEST_FILE_NAME && name != INDEX_FILE_NAME {
                files.push((name, path));
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Identifier of a prompt file name
fn record_id(file_name: &str) -> String {
    file_name
        .strip_suffix(".json")
        .unwrap_or(file_name)
        .to_string()
}

/// Result of a restore operation
#[derive(Debug, Clone, Default)]
pub struct RestoreResult {
    /// Snapshot that was restored
    pub timestamp: String,
    /// Whether the restore ran to completion
    pub success: bool,
    /// Number of prompt files copied
    pub count: usize,
    /// Identifiers of the restored prompts
    pub restored: Vec<String>,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} prompt(s) from backup {}",
            self.count, self.timestamp
        )
    }
}

/// Result of checking a snapshot against its manifest
#[derive(Debug, Clone)]
pub struct BackupVerification {
    /// Snapshot that was checked
    pub timestamp: String,
    /// The manifest, if present and readable
    pub manifest: Option<Manifest>,
    /// Number of prompt files in the snapshot
    pub files: usize,
    /// Manifest entries with no matching file
    pub missing: Vec<String>,
}

impl BackupVerification {
    /// Whether the snapshot has a manifest and every listed prompt file
    pub fn is_complete(&self) -> bool {
        self.manifest.is_some() && self.missing.is_empty()
    }

    /// Get a summary of the snapshot's state
    pub fn summary(&self) -> String {
        match &self.manifest {
            None => format!(
                "Incomplete backup: no readable manifest, {} prompt file(s)",
                self.files
            ),
            Some(_) if !self.missing.is_empty() => format!(
                "Damaged backup: missing {}",
                self.missing.join(", ")
            ),
            Some(manifest) => format!("Complete backup ({} prompts)", manifest.count),
        }
    }
}
