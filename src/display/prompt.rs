//! Prompt display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::index::PromptIndex;
use crate::models::Prompt;
use crate::storage::SkippedRecord;

#[derive(Tabled)]
struct PromptRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Template")]
    template: &'static str,
}

/// Format a list of prompts as a table
pub fn format_prompt_list(prompts: &[Prompt]) -> String {
    if prompts.is_empty() {
        return "No prompts found.".to_string();
    }

    let rows = prompts.iter().map(|p| PromptRow {
        id: p.id.clone(),
        name: p.name.clone(),
        category: p.category.clone().unwrap_or_default(),
        tags: p.tags.join(", "),
        template: if p.is_template { "yes" } else { "" },
    });

    Table::new(rows).with(Style::sharp()).to_string()
}

/// Format a single prompt with all of its fields
pub fn format_prompt_details(prompt: &Prompt) -> String {
    let mut output = String::new();
    output.push_str(&format!("Prompt: {}\n", prompt.name));
    output.push_str(&format!("  ID:          {}\n", prompt.id));
    if let Some(description) = &prompt.description {
        output.push_str(&format!("  Description: {}\n", description));
    }
    if let Some(category) = &prompt.category {
        output.push_str(&format!("  Category:    {}\n", category));
    }
    if !prompt.tags.is_empty() {
        output.push_str(&format!("  Tags:        {}\n", prompt.tags.join(", ")));
    }
    output.push_str(&format!(
        "  Template:    {}\n",
        if prompt.is_template { "yes" } else { "no" }
    ));
    if !prompt.variables.is_empty() {
        output.push_str(&format!("  Variables:   {}\n", prompt.variables.join(", ")));
    }
    if let Some(updated) = prompt.updated_at {
        output.push_str(&format!(
            "  Updated:     {}\n",
            updated.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    output.push('\n');
    output.push_str(&prompt.content);
    output.push('\n');
    output
}

/// Format the records a bulk operation skipped
pub fn format_skipped(skipped: &[SkippedRecord]) -> String {
    if skipped.is_empty() {
        return String::new();
    }

    let mut output = format!("Skipped {} record(s):\n", skipped.len());
    for record in skipped {
        output.push_str(&format!("  - {}\n", record));
    }
    output
}

#[derive(Tabled)]
struct IndexRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

/// Format the contents of `index.json`
pub fn format_index(index: &PromptIndex) -> String {
    let header = format!(
        "Index v{}: {} prompt(s), updated {}\n",
        index.metadata.version, index.metadata.total_prompts, index.metadata.last_updated
    );

    if index.prompts.is_empty() {
        return header;
    }

    let rows = index.prompts.iter().map(|e| IndexRow {
        id: e.id.clone(),
        name: e.name.clone(),
        description: e.description.clone().unwrap_or_default(),
        tags: e.tags.join(", "),
    });

    format!("{}{}", header, Table::new(rows).with(Style::sharp()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SkipReason;

    #[test]
    fn test_empty_list() {
        assert_eq!(format_prompt_list(&[]), "No prompts found.");
    }

    #[test]
    fn test_list_contains_rows() {
        let prompts = vec![
            Prompt::new("Code Review", "x").with_tags(["dev", "review"]),
            Prompt::template("Greeting", "Hi {{name}}"),
        ];
        let output = format_prompt_list(&prompts);
        assert!(output.contains("code-review"));
        assert!(output.contains("dev, review"));
        assert!(output.contains("greeting"));
    }

    #[test]
    fn test_details() {
        let prompt = Prompt::template("Greeting", "Hi {{name}}").with_description("Says hi");
        let output = format_prompt_details(&prompt);
        assert!(output.contains("Description: Says hi"));
        assert!(output.contains("Variables:   name"));
        assert!(output.ends_with("Hi {{name}}\n"));
    }

    #[test]
    fn test_skipped() {
        assert!(format_skipped(&[]).is_empty());
        let output = format_skipped(&[SkippedRecord::new(
            "b",
            SkipReason::MissingField("description"),
        )]);
        assert!(output.contains("Skipped 1 record(s)"));
        assert!(output.contains("b: missing required field 'description'"));
    }
}
