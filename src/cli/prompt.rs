//! Prompt CLI command.
//!
//! Provides subcommands for managing the prompt directory without going
//! through the MCP server.

// CLI commands are allowed to use println! for output
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]
// CLI commands take owned strings from clap parsing
#![allow(clippy::needless_pass_by_value)]

use crate::models::{PromptQuery, PromptRecord};
use crate::rendering;
use crate::storage::prompt::PromptStorage;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Read;
use std::path::PathBuf;

/// Maximum description width in table output.
const DESCRIPTION_WIDTH: usize = 40;

/// Output format for prompt commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default for list).
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    /// Parses output format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Arguments for the `prompt save` command.
#[derive(Debug, Clone, Default)]
pub struct SavePromptArgs {
    /// Prompt name.
    pub name: String,
    /// Optional inline content.
    pub content: Option<String>,
    /// Optional title.
    pub title: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Optional comma-separated tags.
    pub tags: Option<String>,
    /// Optional comma-separated argument names.
    pub arguments: Option<String>,
    /// Optional file path to load content from.
    pub from_file: Option<PathBuf>,
}

impl SavePromptArgs {
    /// Creates new save arguments with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the comma-separated argument names.
    #[must_use]
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    /// Sets the comma-separated tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Builds the record to save, reading content from a file or stdin when
    /// none was given inline.
    fn into_record(self) -> Result<PromptRecord> {
        let content = match (self.content, self.from_file) {
            (Some(content), _) => content,
            (None, Some(path)) => {
                std::fs::read_to_string(&path).map_err(|e| Error::OperationFailed {
                    operation: "read_prompt_source".to_string(),
                    cause: format!("{}: {e}", path.display()),
                })?
            },
            (None, None) => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| Error::OperationFailed {
                        operation: "read_stdin".to_string(),
                        cause: e.to_string(),
                    })?;
                buf
            },
        };

        Ok(PromptRecord::new(self.name, content)
            .with_title(self.title.unwrap_or_default())
            .with_description(self.description.unwrap_or_default())
            .with_arguments(split_list(self.arguments.as_deref()))
            .with_tags(split_list(self.tags.as_deref())))
    }
}

/// Saves a prompt.
///
/// # Errors
///
/// Returns an error if the content cannot be read or the store rejects the
/// record.
pub fn cmd_prompt_save(
    store: &dyn PromptStorage,
    args: SavePromptArgs,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let record = args.into_record()?;
    let name = record.name.clone();
    store.update(record)?;
    println!("Saved prompt '{name}'");
    Ok(())
}

/// Lists all prompts.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn cmd_prompt_list(
    store: &dyn PromptStorage,
    format: OutputFormat,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let prompts = store.list(&PromptQuery::all())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prompts)?),
        OutputFormat::Table => print!("{}", format_prompts_table(&prompts)),
    }

    Ok(())
}

/// Prints a prompt, rendered with the given `KEY=VALUE` variables unless
/// `raw` is set.
///
/// # Errors
///
/// Returns an error if a variable is malformed or the prompt does not exist.
pub fn cmd_prompt_get(
    store: &dyn PromptStorage,
    name: String,
    variables: Vec<String>,
    raw: bool,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let record = store.read(&name)?;

    if raw {
        println!("{}", record.content);
        return Ok(());
    }

    let arguments = parse_variables(&variables)?;
    match rendering::try_render(&record.content, &arguments) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Warning: {e}; printing unrendered content");
            println!("{}", record.content);
        },
    }

    Ok(())
}

/// Deletes a prompt.
///
/// # Errors
///
/// Returns an error if the prompt does not exist or its file cannot be
/// removed.
pub fn cmd_prompt_delete(
    store: &dyn PromptStorage,
    name: String,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    store.delete(&name)?;
    println!("Deleted prompt '{name}'");
    Ok(())
}

/// Parses `KEY=VALUE` pairs.
fn parse_variables(variables: &[String]) -> Result<HashMap<String, String>> {
    variables
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                .ok_or_else(|| {
                    Error::InvalidInput(format!("variable '{pair}' is not of the form KEY=VALUE"))
                })
        })
        .collect()
}

/// Splits a comma-separated list, dropping empty items.
fn split_list(list: Option<&str>) -> Vec<String> {
    list.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Formats prompts as a table.
fn format_prompts_table(prompts: &[PromptRecord]) -> String {
    if prompts.is_empty() {
        return "No prompts found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:<40} ARGUMENTS", "NAME", "DESCRIPTION");
    let _ = writeln!(out, "{}", "-".repeat(80));

    for prompt in prompts {
        let desc = truncate(&prompt.description, DESCRIPTION_WIDTH);
        let _ = writeln!(
            out,
            "{:<24} {:<40} {}",
            prompt.name,
            desc,
            prompt.arguments.join(", ")
        );
    }

    out
}

/// Truncates text to `width` characters, marking the cut with `...`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::prompt::FilesystemPromptStorage;
    use tempfile::TempDir;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::parse("anything"), OutputFormat::Table);
    }

    #[test]
    fn test_parse_variables() {
        let vars = parse_variables(&["name=Bob".to_string(), "expr=a=b".to_string()]).unwrap();
        assert_eq!(vars.get("name").map(String::as_str), Some("Bob"));
        assert_eq!(vars.get("expr").map(String::as_str), Some("a=b"));

        assert!(parse_variables(&["novalue".to_string()]).is_err());
        assert!(parse_variables(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("a, b,,c ")), vec!["a", "b", "c"]);
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_format_prompts_table() {
        assert_eq!(format_prompts_table(&[]), "No prompts found.\n");

        let table = format_prompts_table(&[PromptRecord::new("review", "x")
            .with_description("Review code")
            .with_arguments(["language", "file"])]);
        assert!(table.starts_with("NAME"));
        assert!(table.contains("review"));
        assert!(table.contains("language, file"));
    }

    #[test]
    fn test_save_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemPromptStorage::open(dir.path()).unwrap();

        let args = SavePromptArgs::new("cli-prompt")
            .with_content("Hello {{ .who }}")
            .with_arguments("who")
            .with_tags("greeting, demo");
        cmd_prompt_save(&store, args).unwrap();

        let record = store.read("cli-prompt").unwrap();
        assert_eq!(record.arguments, vec!["who"]);
        assert_eq!(record.tags.len(), 2);

        cmd_prompt_delete(&store, "cli-prompt".to_string()).unwrap();
        assert!(store.read("cli-prompt").is_err());
        assert!(cmd_prompt_delete(&store, "cli-prompt".to_string()).is_err());
    }

    #[test]
    fn test_save_from_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        std::fs::write(&source, "from a file").unwrap();
        let prompts = dir.path().join("prompts");
        std::fs::create_dir(&prompts).unwrap();
        let store = FilesystemPromptStorage::open(&prompts).unwrap();

        let mut args = SavePromptArgs::new("filed");
        args.from_file = Some(source);
        cmd_prompt_save(&store, args).unwrap();

        assert_eq!(store.read("filed").unwrap().content, "from a file");
    }
}
