//! Backup manager for prompt-vault
//!
//! Creates timestamped snapshot directories of the prompt store and lists
//! the snapshots that exist.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::paths::VaultPaths;
use crate::error::{VaultError, VaultResult};
use crate::models::PromptSummary;
use crate::storage::{
    read_json, write_json_atomic, PromptRepository, RawDocument, SkippedRecord,
};

/// File name of the manifest inside each snapshot
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Count reported for snapshots whose manifest is missing or unreadable
pub const MISSING_MANIFEST_COUNT: i64 = -1;

/// How many later milliseconds to try when a snapshot name is taken
const MAX_NAME_ATTEMPTS: i64 = 1000;

/// Description of a snapshot's contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Snapshot identifier (also the directory name)
    pub timestamp: String,
    /// Number of prompt files copied
    pub count: usize,
    /// Identifier and name of every copied prompt
    pub prompts: Vec<PromptSummary>,
    /// Creation time as ISO-8601
    #[serde(default)]
    pub date: Option<String>,
}

/// Metadata about a snapshot on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Snapshot identifier (directory name)
    pub timestamp: String,
    /// Full path to the snapshot directory
    pub path: PathBuf,
    /// Prompt count from the manifest, or `MISSING_MANIFEST_COUNT`
    pub count: i64,
    /// Creation time decoded from the identifier
    pub created_at: Option<DateTime<Utc>>,
}

impl BackupInfo {
    /// Whether the snapshot has a readable manifest
    pub fn is_complete(&self) -> bool {
        self.count != MISSING_MANIFEST_COUNT
    }
}

/// Outcome of creating a snapshot
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Snapshot directory
    pub path: PathBuf,
    /// The manifest as written
    pub manifest: Manifest,
    /// Prompt files that could not be parsed and were left out
    pub skipped: Vec<SkippedRecord>,
}

/// Creates and lists snapshots of the prompt store
pub struct BackupManager {
    repository: PromptRepository,
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Create a manager snapshotting `repository` into `backup_dir`
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

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Snapshot every readable prompt
    ///
    /// Returns the path to the snapshot directory.
    pub fn create_backup(&self) -> VaultResult<PathBuf> {
        Ok(self.create_backup_with_report()?.path)
    }

    /// Snapshot every readable prompt and report what was copied and skipped
    ///
    /// Prompt files are copied byte for byte. Any file that parses as JSON is
    /// kept, whatever fields it carries. The manifest is written after
    /// the last copy; if any copy fails the error is returned and the
    /// snapshot is left without a manifest.
    pub fn create_backup_with_report(&self) -> VaultResult<BackupReport> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let (timestamp, snapshot_dir) = self.reserve_snapshot_dir(now)?;

        let scan = self.repository.scan_documents()?;
        let mut prompts = Vec::with_capacity(scan.items.len());

        for raw in &scan.items {
            let dest = snapshot_dir.join(format!("{}.json", raw.key));
            fs::copy(&raw.path, &dest).map_err(|e| {
                VaultError::Io(format!(
                    "Failed to copy {} into backup {}: {}",
                    raw.key, timestamp, e
                ))
            })?;
            prompts.push(manifest_entry(raw));
        }

        let manifest = Manifest {
            timestamp: timestamp.clone(),
            count: prompts.len(),
            prompts,
            date: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };

        // Must stay last: a manifest marks the snapshot as complete.
        write_json_atomic(snapshot_dir.join(MANIFEST_FILE_NAME), &manifest)?;

        info!(
            backup = %timestamp,
            count = manifest.count,
            skipped = scan.skipped.len(),
            "created backup"
        );

        Ok(BackupReport {
            path: snapshot_dir,
            manifest,
            skipped: scan.skipped,
        })
    }

    /// Claim a fresh snapshot directory named after `now`
    ///
    /// Names are created exclusively. When one is already taken the next
    /// millisecond is tried, so identifiers stay unique and keep sorting in
    /// creation order.
    fn reserve_snapshot_dir(&self, now: DateTime<Utc>) -> VaultResult<(String, PathBuf)> {
        for offset in 0..MAX_NAME_ATTEMPTS {
            let timestamp = snapshot_id(now + Duration::milliseconds(offset));
            let dir = self.backup_dir.join(&timestamp);
            match fs::create_dir(&dir) {
                Ok(()) => return Ok((timestamp, dir)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(VaultError::Io(format!(
                        "Failed to create backup {}: {}",
                        timestamp, e
                    )))
                }
            }
        }

        Err(VaultError::Storage(
            "Could not find a free backup name".into(),
        ))
    }

    /// List all snapshots, newest first
    ///
    /// A snapshot whose manifest is missing or unreadable is still listed,
    /// with a count of `MISSING_MANIFEST_COUNT`.
    pub fn list_backups(&self) -> VaultResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| VaultError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| VaultError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.is_dir() {
                backups.push(self.backup_info(path));
            }
        }

        // Fixed-width, zero-padded names sort chronologically as strings
        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(backups)
    }

    /// Describe the snapshot at `path`
    fn backup_info(&self, path: PathBuf) -> BackupInfo {
        let timestamp = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let count = match read_json::<Manifest, _>(path.join(MANIFEST_FILE_NAME), &timestamp) {
            Ok(Some(manifest)) => manifest.count as i64,
            Ok(None) => {
                warn!(backup = %timestamp, "backup has no manifest");
                MISSING_MANIFEST_COUNT
            }
            Err(e) => {
                warn!(backup = %timestamp, error = %e, "backup manifest is unreadable");
                MISSING_MANIFEST_COUNT
            }
        };

        BackupInfo {
            created_at: parse_snapshot_timestamp(&timestamp),
            timestamp,
            path,
            count,
        }
    }

    /// Get a specific snapshot by identifier
    pub fn get_backup(&self, timestamp: &str) -> VaultResult<Option<BackupInfo>> {
        let dir = self.snapshot_dir(timestamp)?;
        if dir.is_dir() {
            Ok(Some(self.backup_info(dir)))
        } else {
            Ok(None)
        }
    }

    /// Get the most recent snapshot
    pub fn get_latest_backup(&self) -> VaultResult<Option<BackupInfo>> {
        let backups = self.list_backups()?;
        Ok(backups.into_iter().next())
    }

    /// Read a snapshot's manifest
    pub fn read_manifest(&self, timestamp: &str) -> VaultResult<Manifest> {
        let dir = self.snapshot_dir(timestamp)?;
        if !dir.is_dir() {
            return Err(VaultError::backup_not_found(timestamp));
        }

        read_json(dir.join(MANIFEST_FILE_NAME), timestamp)?.ok_or_else(|| VaultError::NotFound {
            entity_type: "Manifest",
            identifier: timestamp.to_string(),
        })
    }

    /// Directory for `timestamp` under the backup root
    ///
    /// Identifiers that would escape the backup root are reported as not
    /// found.
    pub(crate) fn snapshot_dir(&self, timestamp: &str) -> VaultResult<PathBuf> {
        snapshot_path(&self.backup_dir, timestamp)
    }
}

/// The (identifier, name) pair for a copied file
///
/// Falls back to the file stem and an empty name when the document lacks
/// string `id` or `name` fields.
fn manifest_entry(raw: &RawDocument) -> PromptSummary {
    let text = |field: &str| raw.document.get(field).and_then(Value::as_str);
    PromptSummary {
        id: text("id").unwrap_or(raw.key.as_str()).to_string(),
        name: text("name").unwrap_or_default().to_string(),
    }
}

/// Join `timestamp` onto `backup_dir`, rejecting anything that is not a plain name
pub(crate) fn snapshot_path(backup_dir: &Path, timestamp: &str) -> VaultResult<PathBuf> {
    if timestamp.is_empty()
        || timestamp == "."
        || timestamp == ".."
        || timestamp.contains(['/', '\\'])
    {
        return Err(VaultError::backup_not_found(timestamp));
    }
    Ok(backup_dir.join(timestamp))
}

/// Directory-safe snapshot identifier for `time`
///
/// ISO-8601 with millisecond precision and `:`/`.` replaced by `-`, e.g.
/// `2025-11-27T14-30-22-456Z`.
pub fn snapshot_id(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Decode a snapshot identifier back into a timestamp
pub fn parse_snapshot_timestamp(id: &str) -> Option<DateTime<Utc>> {
    // Expected format: YYYY-MM-DDTHH-MM-SS-mmmZ
    let (date, time) = id.split_once('T')?;
    let time = time.strip_suffix('Z')?;

    let parts: Vec<&str> = time.split('-').collect();
    let [hour, minute, second, millis] = parts.as_slice() else {
        return None;
    };

    let iso = format!("{}T{}:{}:{}.{}Z", date, hour, minute, second, millis);
    DateTime::parse_from_rfc3339(&iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Prompt;
    use crate::storage::{PromptStore, SkipReason};
    use chrono::{Datelike, TimeZone, Timelike};
    use tempfile::TempDir;

    fn create_test_manager() -> (TempDir, PromptRepository, BackupManager) {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let repo = PromptRepository::new(paths.prompts_dir());
        let manager = BackupManager::from_paths(&paths);
        (temp_dir, repo, manager)
    }

    fn put(repo: &PromptRepository, id: &str) {
        let prompt = Prompt::new(format!("Name {}", id), "body")
            .with_id(id)
            .with_tags(["t"]);
        repo.put(id, &prompt).unwrap();
    }

    #[test]
    fn test_snapshot_id_format() {
        let time = Utc.with_ymd_and_hms(2025, 11, 27, 14, 30, 22).unwrap()
            + Duration::milliseconds(456);
        assert_eq!(snapshot_id(time), "2025-11-27T14-30-22-456Z");
    }

    #[test]
    fn test_parse_snapshot_timestamp() {
        let ts = parse_snapshot_timestamp("2025-11-27T14-30-22-456Z").unwrap();
        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.month(), 11);
        assert_eq!(ts.hour(), 14);
        assert_eq!(ts.timestamp_subsec_millis(), 456);

        assert!(parse_snapshot_timestamp("not-a-backup").is_none());
        assert!(parse_snapshot_timestamp("2025-11-27T14-30-22Z").is_none());
    }

    #[test]
    fn test_snapshot_id_round_trip() {
        let now = Utc::now();
        let parsed = parse_snapshot_timestamp(&snapshot_id(now)).unwrap();
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn test_create_backup_copies_prompts_and_manifest() {
        let (_temp, repo, manager) = create_test_manager();
        put(&repo, "a");
        put(&repo, "b");

        let report = manager.create_backup_with_report().unwrap();
        assert!(report.path.join("a.json").exists());
        assert!(report.path.join("b.json").exists());
        assert!(report.path.join(MANIFEST_FILE_NAME).exists());

        assert_eq!(report.manifest.count, 2);
        let ids: Vec<_> = report.manifest.prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(report.manifest.prompts[0].name, "Name a");

        assert_eq!(
            fs::read(repo.root().join("a.json")).unwrap(),
            fs::read(report.path.join("a.json")).unwrap()
        );
    }

    #[test]
    fn test_create_backup_skips_corrupt_and_index() {
        let (_temp, repo, manager) = create_test_manager();
        put(&repo, "a");
        fs::write(repo.root().join("broken.json"), "nope").unwrap();
        fs::write(repo.root().join("index.json"), "{}").unwrap();

        let report = manager.create_backup_with_report().unwrap();
        assert_eq!(report.manifest.count, 1);
        assert!(!report.path.join("broken.json").exists());
        assert!(!report.path.join("index.json").exists());
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0].reason, SkipReason::Parse(_)));
    }

    #[test]
    fn test_create_backup_keeps_loosely_shaped_records() {
        let (_temp, repo, manager) = create_test_manager();
        put(&repo, "a");
        fs::write(
            repo.root().join("p.json"),
            r#"{"id":"p","content":"c","tags":"x"}"#,
        )
        .unwrap();
        fs::write(repo.root().join("q.json"), r#"{"content":"no id"}"#).unwrap();

        let report = manager.create_backup_with_report().unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.manifest.count, 3);
        assert!(report.path.join("p.json").exists());
        assert!(report.path.join("q.json").exists());

        let p = &report.manifest.prompts[1];
        assert_eq!((p.id.as_str(), p.name.as_str()), ("p", ""));
        let q = &report.manifest.prompts[2];
        assert_eq!((q.id.as_str(), q.name.as_str()), ("q", ""));
    }

    #[test]
    fn test_create_backup_of_empty_store() {
        let (_temp, _repo, manager) = create_test_manager();

        let path = manager.create_backup().unwrap();
        let manifest = manager
            .read_manifest(&path.file_name().unwrap().to_string_lossy())
            .unwrap();
        assert_eq!(manifest.count, 0);
        assert!(manifest.prompts.is_empty());
    }

    #[test]
    fn test_backups_in_same_millisecond_get_unique_names() {
        let (_temp, _repo, manager) = create_test_manager();
        fs::create_dir_all(manager.backup_dir()).unwrap();

        let now = Utc::now();
        let (first, _) = manager.reserve_snapshot_dir(now).unwrap();
        let (second, _) = manager.reserve_snapshot_dir(now).unwrap();

        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (_temp, repo, manager) = create_test_manager();
        put(&repo, "a");

        for _ in 0..3 {
            manager.create_backup().unwrap();
        }

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 3);
        assert!(backups[0].timestamp > backups[1].timestamp);
        assert!(backups[1].timestamp > backups[2].timestamp);
        assert!(backups.iter().all(|b| b.count == 1 && b.created_at.is_some()));
    }

    #[test]
    fn test_list_backups_tolerates_bad_manifests() {
        let (_temp, repo, manager) = create_test_manager();
        put(&repo, "a");

        let good = manager.create_backup().unwrap();
        let missing = manager.create_backup().unwrap();
        let corrupt = manager.create_backup().unwrap();
        fs::remove_file(missing.join(MANIFEST_FILE_NAME)).unwrap();
        fs::write(corrupt.join(MANIFEST_FILE_NAME), "{ broken").unwrap();
        fs::write(manager.backup_dir().join("stray.txt"), "not a backup").unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 3);

        let count_of = |path: &Path| {
            backups
                .iter()
                .find(|b| b.path == path)
                .map(|b| b.count)
                .unwrap()
        };
        assert_eq!(count_of(&good), 1);
        assert_eq!(count_of(&missing), MISSING_MANIFEST_COUNT);
        assert_eq!(count_of(&corrupt), MISSING_MANIFEST_COUNT);
        assert!(!backups[0].is_complete());
    }

    #[test]
    fn test_empty_backup_dir() {
        let (_temp, _repo, manager) = create_test_manager();
        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.get_latest_backup().unwrap().is_none());
    }

    #[test]
    fn test_get_backup_and_latest() {
        let (_temp, _repo, manager) = create_test_manager();
        manager.create_backup().unwrap();
        let newest = manager.create_backup().unwrap();
        let newest_id = newest.file_name().unwrap().to_string_lossy().into_owned();

        let latest = manager.get_latest_backup().unwrap().unwrap();
        assert_eq!(latest.timestamp, newest_id);

        assert!(manager.get_backup(&newest_id).unwrap().is_some());
        assert!(manager.get_backup("1999-01-01T00-00-00-000Z").unwrap().is_none());
        assert!(manager.get_backup("../etc").unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_manifest_errors() {
        let (_temp, _repo, manager) = create_test_manager();
        assert!(manager.read_manifest("missing").unwrap_err().is_not_found());

        let path = manager.create_backup().unwrap();
        let id = path.file_name().unwrap().to_string_lossy().into_owned();
        fs::write(path.join(MANIFEST_FILE_NAME), "junk").unwrap();
        assert!(manager.read_manifest(&id).unwrap_err().is_parse());
    }
}
