use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pvault(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pvault").unwrap();
    cmd.env("PROMPT_VAULT_DIR", home.path())
        .env_remove("PROMPTS_DIR")
        .env_remove("BACKUP_DIR")
        .env_remove("PROMPT_VAULT_DB")
        .env_remove("RUST_LOG");
    cmd
}

fn add_prompt(home: &TempDir, name: &str, content: &str) {
    pvault(home)
        .args(["prompt", "add", name, content, "-d", "desc", "-t", "demo"])
        .assert()
        .success();
}

#[test]
fn test_config_shows_paths() {
    let home = TempDir::new().unwrap();
    pvault(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prompts directory"))
        .stdout(predicate::str::contains(home.path().to_string_lossy().as_ref()));
}

#[test]
fn test_init_creates_layout() {
    let home = TempDir::new().unwrap();
    pvault(&home).arg("init").assert().success();

    assert!(home.path().join("prompts").is_dir());
    assert!(home.path().join("backups").is_dir());
    assert!(home.path().join("config.json").is_file());
}

#[test]
fn test_add_list_and_index() {
    let home = TempDir::new().unwrap();
    add_prompt(&home, "Code Review", "Review this code");

    pvault(&home)
        .args(["prompt", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("code-review"));

    let index = fs::read_to_string(home.path().join("prompts/index.json")).unwrap();
    assert!(index.contains("\"totalPrompts\": 1"));

    pvault(&home)
        .args(["index", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 prompt(s)"));
}

#[test]
fn test_render_template() {
    let home = TempDir::new().unwrap();
    pvault(&home)
        .args(["prompt", "add", "Greeting", "Hello {{ name }}!", "--template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Variables: name"));

    pvault(&home)
        .args(["prompt", "render", "greeting", "--var", "name=Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello Ada!"));
}

#[test]
fn test_get_missing_prompt_fails() {
    let home = TempDir::new().unwrap();
    pvault(&home)
        .args(["prompt", "get", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt not found: ghost"));
}

#[test]
fn test_backup_and_restore_latest() {
    let home = TempDir::new().unwrap();
    add_prompt(&home, "Alpha", "one");
    add_prompt(&home, "Beta", "two");

    pvault(&home)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Prompts: 2"));

    pvault(&home)
        .args(["prompt", "delete", "alpha"])
        .assert()
        .success();
    assert!(!home.path().join("prompts/alpha.json").exists());

    pvault(&home)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pre-restore backup saved"))
        .stdout(predicate::str::contains("Restore complete"));
    assert!(home.path().join("prompts/alpha.json").exists());

    pvault(&home)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2 backup(s)"));

    // The pre-restore snapshot holds the store as it was before the restore
    let mut snapshots: Vec<_> = fs::read_dir(home.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    snapshots.sort();
    assert!(snapshots[0].join("alpha.json").exists());
    assert!(!snapshots[1].join("alpha.json").exists());
    assert!(snapshots[1].join("beta.json").exists());
}

#[test]
fn test_restore_unknown_backup_fails() {
    let home = TempDir::new().unwrap();
    pvault(&home)
        .args(["backup", "restore", "2000-01-01T00-00-00-000Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backup not found"));
    assert!(!home.path().join("backups").exists());
}

#[test]
fn test_mirror_export_and_import() {
    let home = TempDir::new().unwrap();
    add_prompt(&home, "Alpha", "one");

    pvault(&home)
        .args(["db", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 copied"));

    pvault(&home)
        .args(["db", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"));

    pvault(&home)
        .args(["prompt", "delete", "alpha"])
        .assert()
        .success();

    pvault(&home)
        .args(["db", "import"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 copied"));
    assert!(home.path().join("prompts/alpha.json").exists());
}
