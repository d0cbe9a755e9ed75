//! MCP prompt translation.
//!
//! Maps stored [`PromptRecord`]s onto the wire shapes of `prompts/list` and
//! `prompts/get`.

use crate::models::PromptRecord;
use crate::rendering;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt as advertised by `prompts/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Prompt name.
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Human-readable description.
    pub description: String,
    /// Arguments the prompt accepts.
    pub arguments: Vec<PromptArgument>,
}

impl From<&PromptRecord> for PromptDefinition {
    fn from(record: &PromptRecord) -> Self {
        Self {
            name: record.name.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            arguments: record
                .arguments
                .iter()
                .map(|name| PromptArgument {
                    name: name.clone(),
                    required: false,
                })
                .collect(),
        }
    }
}

/// One prompt argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Whether the argument is required. Always false: a missing argument
    /// leaves the content unrendered instead of failing the request.
    pub required: bool,
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPromptResult {
    /// Prompt description.
    pub description: String,
    /// Messages making up the prompt.
    pub messages: Vec<PromptMessage>,
}

impl GetPromptResult {
    /// Renders a record into a single user message.
    #[must_use]
    pub fn render(record: &PromptRecord, arguments: &HashMap<String, String>) -> Self {
        Self {
            description: record.description.clone(),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: PromptContent::Text {
                    text: rendering::render(&record.content, arguments),
                },
            }],
        }
    }
}

/// A message in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Message role.
    pub role: String,
    /// Message content.
    pub content: PromptContent,
}

/// Content of a prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PromptContent {
    /// Text content.
    Text {
        /// The text.
        text: String,
    },
}
