//! Prompt CLI commands
//!
//! Implements CLI commands for the file-backed prompt store.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Subcommand;

use super::refresh_index;
use crate::config::{Settings, VaultPaths};
use crate::display::{format_prompt_details, format_prompt_list, format_skipped};
use crate::error::{VaultError, VaultResult};
use crate::models::Prompt;
use crate::storage::{PromptRepository, PromptStore};

/// Prompt subcommands
#[derive(Subcommand)]
pub enum PromptCommands {
    /// Add a prompt to the store
    Add {
        /// Prompt name
        name: String,
        /// Prompt text (use --file to read it from a file)
        content: Option<String>,
        /// Read the prompt text from a file
        #[arg(short, long, conflicts_with = "content")]
        file: Option<PathBuf>,
        /// Identifier (defaults to a slug of the name)
        #[arg(long)]
        id: Option<String>,
        /// Short description
        #[arg(short, long)]
        description: Option<String>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Treat the text as a template with {{placeholders}}
        #[arg(long)]
        template: bool,
        /// Replace an existing prompt with the same identifier
        #[arg(long)]
        force: bool,
    },
    /// Show a prompt
    Get {
        /// Prompt identifier
        id: String,
        /// Print the stored JSON document
        #[arg(long)]
        json: bool,
    },
    /// List all prompts
    List {
        /// Only prompts in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only prompts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Delete a prompt
    Delete {
        /// Prompt identifier
        id: String,
    },
    /// Render a template prompt with values for its placeholders
    Render {
        /// Prompt identifier
        id: String,
        /// Placeholder value as key=value (repeatable)
        #[arg(short = 'v', long = "var")]
        vars: Vec<String>,
    },
}

/// Handle a prompt command
pub fn handle_prompt_command(
    paths: &VaultPaths,
    settings: &Settings,
    cmd: PromptCommands,
) -> VaultResult<()> {
    let repo = PromptRepository::new(paths.prompts_dir());

    match cmd {
        PromptCommands::Add {
            name,
            content,
            file,
            id,
            description,
            category,
            tags,
            template,
            force,
        } => {
            let content = match (content, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path).map_err(|e| {
                    VaultError::Io(format!("Failed to read {}: {}", path.display(), e))
                })?,
                (None, None) => {
                    return Err(VaultError::Validation(
                        "Prompt content is required. Pass it as an argument or use --file."
                            .into(),
                    ))
                }
            };

            let mut prompt = if template {
                Prompt::template(name, content)
            } else {
                Prompt::new(name, content)
            };
            if let Some(id) = id {
                prompt = prompt.with_id(id);
            }
            if let Some(description) = description {
                prompt = prompt.with_description(description);
            }
            if let Some(category) = category {
                prompt = prompt.with_category(category);
            }
            prompt = prompt.with_tags(tags);

            if prompt.id.is_empty() {
                return Err(VaultError::Validation(format!(
                    "Cannot derive an identifier from '{}'. Use --id.",
                    prompt.name
                )));
            }
            if !force && repo.exists(&prompt.id)? {
                return Err(VaultError::Validation(format!(
                    "Prompt '{}' already exists. Use --force to replace it.",
                    prompt.id
                )));
            }

            repo.put(&prompt.id, &prompt)?;
            refresh_index(paths, settings)?;

            println!("Saved prompt: {}", prompt.name);
            println!("  ID: {}", prompt.id);
            if !prompt.variables.is_empty() {
                println!("  Variables: {}", prompt.variables.join(", "));
            }
        }

        PromptCommands::Get { id, json } => {
            let prompt = repo
                .get(&id)?
                .ok_or_else(|| VaultError::prompt_not_found(&id))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&prompt)?);
            } else {
                print!("{}", format_prompt_details(&prompt));
            }
        }

        PromptCommands::List { category, tag } => {
            let report = repo.list()?;
            let prompts: Vec<Prompt> = report
                .items
                .into_iter()
                .filter(|p| category.is_none() || p.category == category)
                .filter(|p| tag.as_ref().is_none_or(|t| p.tags.contains(t)))
                .collect();

            println!("{}", format_prompt_list(&prompts));
            eprint!("{}", format_skipped(&report.skipped));
        }

        PromptCommands::Delete { id } => {
            if !repo.delete(&id)? {
                return Err(VaultError::prompt_not_found(&id));
            }
            refresh_index(paths, settings)?;
            println!("Deleted prompt: {}", id);
        }

        PromptCommands::Render { id, vars } => {
            let prompt = repo
                .get(&id)?
                .ok_or_else(|| VaultError::prompt_not_found(&id))?;
            let values = parse_vars(&vars)?;

            let missing = prompt.missing_variables(&values);
            if !missing.is_empty() {
                eprintln!("Warning: no value for {}", missing.join(", "));
            }
            println!("{}", prompt.render(&values));
        }
    }

    Ok(())
}

/// Parse `key=value` pairs
fn parse_vars(vars: &[String]) -> VaultResult<HashMap<String, String>> {
    vars.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    VaultError::Validation(format!(
                        "Invalid variable '{}'. Use key=value.",
                        pair
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, VaultPaths, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths, Settings::default())
    }

    fn add(name: &str, content: &str, force: bool) -> PromptCommands {
        PromptCommands::Add {
            name: name.into(),
            content: Some(content.into()),
            file: None,
            id: None,
            description: Some("desc".into()),
            category: None,
            tags: vec!["t".into()],
            template: false,
            force,
        }
    }

    #[test]
    fn test_parse_vars() {
        let values = parse_vars(&["name=Ada".into(), "greeting=a=b".into()]).unwrap();
        assert_eq!(values["name"], "Ada");
        assert_eq!(values["greeting"], "a=b");

        assert!(parse_vars(&["novalue".into()]).unwrap_err().is_validation());
        assert!(parse_vars(&["=x".into()]).is_err());
    }

    #[test]
    fn test_add_writes_record_and_index() {
        let (_temp, paths, settings) = setup();
        handle_prompt_command(&paths, &settings, add("Code Review", "x", false)).unwrap();

        let repo = PromptRepository::new(paths.prompts_dir());
        assert!(repo.exists("code-review").unwrap());
        assert!(paths.index_file().exists());
    }

    #[test]
    fn test_add_refuses_duplicate_without_force() {
        let (_temp, paths, settings) = setup();
        handle_prompt_command(&paths, &settings, add("Code Review", "one", false)).unwrap();

        let err =
            handle_prompt_command(&paths, &settings, add("Code Review", "two", false)).unwrap_err();
        assert!(err.is_validation());

        handle_prompt_command(&paths, &settings, add("Code Review", "two", true)).unwrap();
        let repo = PromptRepository::new(paths.prompts_dir());
        assert_eq!(repo.get("code-review").unwrap().unwrap().content, "two");
    }

    #[test]
    fn test_delete_missing_prompt() {
        let (_temp, paths, settings) = setup();
        let err = handle_prompt_command(
            &paths,
            &settings,
            PromptCommands::Delete { id: "nope".into() },
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
