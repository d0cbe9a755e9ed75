//! YAML front matter encoding for prompt files.
//!
//! File layout:
//! ```text
//! ---
//! id: code-review
//! name: code-review
//! title: Code review
//! ---
//! Please review the following code.
//! ```
//!
//! Parsing walks the file line by line through three states instead of
//! pattern matching the whole text, so every malformed boundary fails the
//! same way.

use crate::models::PromptRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The front matter delimiter line.
pub const DELIMITER: &str = "---";

/// Header fields: everything in a record except its content.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PromptHeader {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    arguments: Vec<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
}

/// Parser position within a prompt file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Skipping blank lines until the opening delimiter.
    SeekingOpen,
    /// Collecting header lines until the closing delimiter.
    Header,
    /// Everything after the closing delimiter.
    Body,
}

/// Splits raw file text into header text and body text.
///
/// The body is trimmed of surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the first non-blank line is not the
/// opening delimiter or if the closing delimiter is missing.
pub fn split(text: &str) -> Result<(String, String)> {
    let mut state = ParseState::SeekingOpen;
    let mut header = String::new();
    let mut body = String::new();

    for line in text.split_inclusive('\n') {
        match state {
            ParseState::SeekingOpen => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed != DELIMITER {
                    return Err(Error::InvalidInput(
                        "front matter missing opening delimiter".to_string(),
                    ));
                }
                state = ParseState::Header;
            },
            ParseState::Header => {
                if line.trim() == DELIMITER {
                    state = ParseState::Body;
                } else {
                    header.push_str(line);
                }
            },
            ParseState::Body => body.push_str(line),
        }
    }

    match state {
        ParseState::Body => Ok((header, body.trim().to_string())),
        ParseState::Header => Err(Error::InvalidInput(
            "front matter missing closing delimiter".to_string(),
        )),
        ParseState::SeekingOpen => Err(Error::InvalidInput(
            "front matter missing opening delimiter".to_string(),
        )),
    }
}

/// Parses a prompt file into a record.
///
/// The identifier is recomputed from the name; any stored `id` is ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] on a malformed boundary, malformed YAML, or
/// a header without a name.
pub fn parse(text: &str) -> Result<PromptRecord> {
    let (header_text, body) = split(text)?;

    let header: PromptHeader = serde_yaml_ng::from_str(&header_text)
        .map_err(|e| Error::InvalidInput(format!("invalid YAML front matter: {e}")))?;

    if header.name.trim().is_empty() {
        return Err(Error::InvalidInput(
            "front matter has no prompt name".to_string(),
        ));
    }

    Ok(PromptRecord {
        id: header.name.clone(),
        name: header.name,
        title: header.title,
        description: header.description,
        arguments: header.arguments,
        content: body,
        tags: header.tags,
    })
}

/// Serializes a record into its file representation.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the header cannot be serialized.
pub fn serialize(record: &PromptRecord) -> Result<String> {
    let header = PromptHeader {
        id: record.id.clone(),
        name: record.name.clone(),
        title: record.title.clone(),
        description: record.description.clone(),
        arguments: record.arguments.clone(),
        tags: record.tags.clone(),
    };

    let yaml = serde_yaml_ng::to_string(&header).map_err(|e| Error::OperationFailed {
        operation: "serialize_front_matter".to_string(),
        cause: e.to_string(),
    })?;

    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", record.content))
}
