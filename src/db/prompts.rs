use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, warn};
use uuid::Uuid;

use super::schema::SCHEMA;
use crate::error::{VaultError, VaultResult};
use crate::models::Prompt;
use crate::storage::{PromptStore, ScanReport, SkipReason, SkippedRecord};

const SELECT_COLUMNS: &str = "SELECT id, name, content, description, category, tags, \
     is_template, variables, created_at, updated_at FROM prompts";

/// SQLite timestamps as written by `CURRENT_TIMESTAMP`
const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Prompt table backed by a SQLite database
pub struct SqliteMirror {
    conn: Connection,
}

impl SqliteMirror {
    /// Open (creating if needed) the database at `path`
    pub fn open(path: &Path) -> VaultResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VaultError::Io(format!("Failed to create database directory: {}", e))
            })?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> VaultResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the table and indexes if they do not exist
    pub fn init(&self) -> VaultResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert or update a prompt, returning its identifier
    ///
    /// A prompt without an identifier is given a fresh UUID.
    pub fn save(&self, prompt: &Prompt) -> VaultResult<String> {
        let id = if prompt.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            prompt.id.clone()
        };

        self.conn.execute(
            "INSERT INTO prompts (id, name, content, description, category, tags, is_template, variables)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                content = excluded.content,
                description = excluded.description,
                category = excluded.category,
                tags = excluded.tags,
                is_template = excluded.is_template,
                variables = excluded.variables,
                updated_at = CURRENT_TIMESTAMP",
            params![
                id,
                prompt.name,
                prompt.content,
                prompt.description,
                prompt.category,
                serde_json::to_string(&prompt.tags)?,
                prompt.is_template,
                serde_json::to_string(&prompt.variables)?,
            ],
        )?;

        debug!(prompt = %id, "saved prompt to mirror");
        Ok(id)
    }

    /// Every prompt ordered by name
    ///
    /// Fails on the first row whose array columns cannot be decoded; use
    /// `PromptStore::list` to skip such rows instead.
    pub fn get_all(&self) -> VaultResult<Vec<Prompt>> {
        self.all_rows()?
            .into_iter()
            .map(|row| {
                let id = row.id.clone();
                row.into_prompt().map_err(|e| VaultError::parse(id, e))
            })
            .collect()
    }

    /// One prompt by identifier
    pub fn get_by_id(&self, id: &str) -> VaultResult<Option<Prompt>> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                MirrorRow::from_row,
            )
            .optional()?;

        row.map(|r| r.into_prompt().map_err(|e| VaultError::parse(id, e)))
            .transpose()
    }

    /// Remove a prompt, returning whether a row was deleted
    pub fn delete(&self, id: &str) -> VaultResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM prompts WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Number of rows in the table
    pub fn count(&self) -> VaultResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prompts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn all_rows(&self) -> VaultResult<Vec<MirrorRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY name, id", SELECT_COLUMNS))?;
        let rows = stmt
            .query_map([], MirrorRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl PromptStore for SqliteMirror {
    fn put(&self, id: &str, prompt: &Prompt) -> VaultResult<()> {
        if id.is_empty() {
            return Err(VaultError::Validation("Prompt id cannot be empty".into()));
        }
        let mut prompt = prompt.clone();
        prompt.id = id.to_string();
        self.save(&prompt).map(|_| ())
    }

    fn get(&self, id: &str) -> VaultResult<Option<Prompt>> {
        self.get_by_id(id)
    }

    fn list(&self) -> VaultResult<ScanReport<Prompt>> {
        let mut report = ScanReport::default();
        for row in self.all_rows()? {
            let id = row.id.clone();
            match row.into_prompt() {
                Ok(prompt) => report.items.push(prompt),
                Err(e) => {
                    warn!(prompt = %id, error = %e, "skipping undecodable mirror row");
                    report.skipped.push(SkippedRecord::new(id, SkipReason::Parse(e)));
                }
            }
        }
        Ok(report)
    }

    fn delete(&self, id: &str) -> VaultResult<bool> {
        SqliteMirror::delete(self, id)
    }
}

/// A row as stored, before the JSON columns are decoded
struct MirrorRow {
    id: String,
    name: String,
    content: String,
    description: Option<String>,
    category: Option<String>,
    tags: String,
    is_template: bool,
    variables: String,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl MirrorRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            content: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            tags: row.get(5)?,
            is_template: row.get(6)?,
            variables: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_prompt(self) -> Result<Prompt, String> {
        let tags: Vec<String> =
            serde_json::from_str(&self.tags).map_err(|e| format!("tags column: {}", e))?;
        let variables: Vec<String> = serde_json::from_str(&self.variables)
            .map_err(|e| format!("variables column: {}", e))?;

        Ok(Prompt {
            id: self.id,
            name: self.name,
            content: self.content,
            description: self.description,
            category: self.category,
            tags,
            is_template: self.is_template,
            variables,
            version: None,
            metadata: serde_json::Map::new(),
            created_at: self.created_at.as_deref().and_then(parse_sqlite_timestamp),
            updated_at: self.updated_at.as_deref().and_then(parse_sqlite_timestamp),
        })
    }
}

fn parse_sqlite_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, SQLITE_TIMESTAMP)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror() -> SqliteMirror {
        let mirror = SqliteMirror::open_in_memory().unwrap();
        mirror.init().unwrap();
        mirror
    }

    fn prompt(id: &str, name: &str) -> Prompt {
        Prompt::template(name, "Hi {{who}}")
            .with_id(id)
            .with_description("greets")
            .with_category("social")
            .with_tags(["a", "b", "a"])
    }

    #[test]
    fn test_init_is_idempotent() {
        let mirror = mirror();
        mirror.init().unwrap();
        assert_eq!(mirror.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_get() {
        let mirror = mirror();
        let original = prompt("p1", "Greeting");

        assert_eq!(mirror.save(&original).unwrap(), "p1");

        let loaded = mirror.get_by_id("p1").unwrap().unwrap();
        assert_eq!(loaded.name, "Greeting");
        assert_eq!(loaded.description.as_deref(), Some("greets"));
        assert_eq!(loaded.category.as_deref(), Some("social"));
        assert_eq!(loaded.tags, vec!["a", "b", "a"]);
        assert!(loaded.is_template);
        assert_eq!(loaded.variables, vec!["who"]);
        assert!(loaded.created_at.is_some());
    }

    #[test]
    fn test_save_generates_id() {
        let mirror = mirror();
        let id = mirror.save(&prompt("", "No id")).unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
        assert!(mirror.get_by_id(&id).unwrap().is_some());
    }

    #[test]
    fn test_save_upserts() {
        let mirror = mirror();
        let mut p = prompt("p1", "First");
        mirror.save(&p).unwrap();

        p.name = "Renamed".into();
        p.category = None;
        mirror.save(&p).unwrap();

        assert_eq!(mirror.count().unwrap(), 1);
        let loaded = mirror.get_by_id("p1").unwrap().unwrap();
        assert_eq!(loaded.name, "Renamed");
        assert!(loaded.category.is_none());
    }

    #[test]
    fn test_get_all_ordered_by_name() {
        let mirror = mirror();
        mirror.save(&prompt("1", "Zulu")).unwrap();
        mirror.save(&prompt("2", "Alpha")).unwrap();
        mirror.save(&prompt("3", "Mike")).unwrap();

        let names: Vec<_> = mirror
            .get_all()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mike", "Zulu"]);
    }

    #[test]
    fn test_get_missing_and_delete() {
        let mirror = mirror();
        assert!(mirror.get_by_id("ghost").unwrap().is_none());

        mirror.save(&prompt("p1", "P")).unwrap();
        assert!(mirror.delete("p1").unwrap());
        assert!(!mirror.delete("p1").unwrap());
    }

    #[test]
    fn test_list_skips_bad_rows() {
        let mirror = mirror();
        mirror.save(&prompt("good", "Good")).unwrap();
        mirror
            .conn
            .execute(
                "INSERT INTO prompts (id, name, content, tags) VALUES ('bad', 'Bad', 'x', 'not json')",
                [],
            )
            .unwrap();

        let report = mirror.list().unwrap();
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.skipped_ids(), vec!["bad"]);

        assert!(mirror.get_all().unwrap_err().is_parse());
        assert!(mirror.get("bad").unwrap_err().is_parse());
    }

    #[test]
    fn test_put_uses_given_id() {
        let mirror = mirror();
        mirror.put("chosen", &prompt("other", "P")).unwrap();

        assert!(mirror.get("chosen").unwrap().is_some());
        assert!(mirror.get("other").unwrap().is_none());
        assert!(mirror.put("", &prompt("x", "P")).unwrap_err().is_validation());
    }

    #[test]
    fn test_open_file_database() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prompts.db");

        {
            let mirror = SqliteMirror::open(&path).unwrap();
            mirror.init().unwrap();
            mirror.save(&prompt("p1", "Persisted")).unwrap();
        }

        let reopened = SqliteMirror::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
