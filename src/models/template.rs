//! Placeholder handling for template prompts

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// Distinct placeholder names in order of first appearance
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = caps[1].trim();
        if !name.is_empty() && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
    }
    variables
}

/// Substitute every supplied `{{ key }}` in `content`
///
/// Placeholders without a value are left in place.
pub fn render_template(content: &str, values: &HashMap<String, String>) -> String {
    // Single pass: substituted values are never scanned for placeholders again.
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            values
                .get(caps[1].trim())
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Derive an identifier from a display name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_variables_dedups_in_order() {
        let vars = extract_variables("{{b}} {{ a }} {{b}} {{}} {{ c}}");
        assert_eq!(vars, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_extract_variables_none() {
        assert!(extract_variables("no placeholders { here }").is_empty());
    }

    #[test]
    fn test_render_template_whitespace_tolerant() {
        let mut values = HashMap::new();
        values.insert("lang".to_string(), "Rust".to_string());
        values.insert("unused".to_string(), "x".to_string());

        let out = render_template("Write {{lang}} like {{  lang }} in {{ other }}", &values);
        assert_eq!(out, "Write Rust like Rust in {{ other }}");
    }

    #[test]
    fn test_render_value_is_literal() {
        let mut values = HashMap::new();
        values.insert("v".to_string(), "$1 and {{v}}".to_string());
        assert_eq!(render_template("[{{v}}]", &values), "[$1 and {{v}}]");
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let mut values = HashMap::new();
        values.insert("a".to_string(), "{{b}}".to_string());
        values.insert("b".to_string(), "X".to_string());

        for _ in 0..32 {
            assert_eq!(render_template("[{{a}}] [{{ b }}]", &values), "[{{b}}] [X]");
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Code Review"), "code-review");
        assert_eq!(slugify("  --Hello, World!-- "), "hello-world");
        assert_eq!(slugify("Ünïcode 2"), "n-code-2");
        assert_eq!(slugify("!!!"), "");
    }
}
