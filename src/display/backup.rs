//! Backup display formatting

use chrono::Utc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::{BackupInfo, BackupVerification};

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Backup")]
    timestamp: String,
    #[tabled(rename = "Prompts")]
    count: String,
    #[tabled(rename = "Age")]
    age: String,
}

/// Format a list of backups, newest first, as a table
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let rows = backups.iter().enumerate().map(|(i, b)| BackupRow {
        position: i + 1,
        timestamp: b.timestamp.clone(),
        count: if b.is_complete() {
            b.count.to_string()
        } else {
            "incomplete".to_string()
        },
        age: b
            .created_at
            .map(|t| format_duration(Utc::now().signed_duration_since(t)))
            .unwrap_or_else(|| "?".to_string()),
    });

    format!(
        "{}\nTotal: {} backup(s)",
        Table::new(rows).with(Style::sharp()),
        backups.len()
    )
}

/// Format the result of verifying a backup
pub fn format_verification(verification: &BackupVerification) -> String {
    let mut output = format!("Backup: {}\n", verification.timestamp);
    if let Some(manifest) = &verification.manifest {
        if let Some(date) = &manifest.date {
            output.push_str(&format!("Created: {}\n", date));
        }
        output.push_str(&format!("Manifest count: {}\n", manifest.count));
        for prompt in &manifest.prompts {
            output.push_str(&format!("  - {} ({})\n", prompt.name, prompt.id));
        }
    }
    output.push_str(&format!("Prompt files: {}\n", verification.files));
    output.push_str(&format!("Status: {}\n", verification.summary()));
    output
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}
