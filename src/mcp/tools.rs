//! MCP tool implementations.
//!
//! A single tool is exposed: `create_prompt`, which saves a new prompt into
//! the store.

use super::error::{ErrorCode, ErrorObject};
use crate::models::PromptRecord;
use crate::storage::prompt::PromptStorage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name of the prompt creation tool.
pub const CREATE_PROMPT_TOOL: &str = "create_prompt";

/// Registry of MCP tools.
pub struct ToolRegistry {
    /// Available tools, ordered by name.
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolRegistry {
    /// Creates a new tool registry with all prompter tools.
    #[must_use]
    pub fn new() -> Self {
        let mut tools = BTreeMap::new();

        tools.insert(
            CREATE_PROMPT_TOOL.to_string(),
            ToolDefinition {
                name: CREATE_PROMPT_TOOL.to_string(),
                title: "Create prompt".to_string(),
                description: "Create and save a new prompt".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Computer readable name for the prompt. White space should be replaced with underscores and special characters omitted."
                        },
                        "title": {
                            "type": "string",
                            "description": "Human readable display name for the prompt. This should be kept short and to the point."
                        },
                        "description": {
                            "type": "string",
                            "description": "Human readable explanation what the prompt is for expanding the title."
                        },
                        "content": {
                            "type": "string",
                            "description": "Full content of the prompt to be created and stored."
                        },
                        "arguments": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Optional names of placeholders used in the content as {{ .argument }}"
                        },
                        "tags": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Optional tags for categorization"
                        }
                    },
                    "required": ["name"]
                }),
            },
        );

        Self { tools }
    }

    /// Returns all tool definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Executes a tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnsupportedTool`] for an unknown tool,
    /// [`ErrorCode::InvalidParams`] for bad arguments, and
    /// [`ErrorCode::GeneralFailure`] if the store rejects the write.
    pub fn execute(
        &self,
        store: &dyn PromptStorage,
        name: &str,
        arguments: Value,
    ) -> std::result::Result<ToolResult, ErrorObject> {
        let Some(tool) = self.get_tool(name) else {
            return Err(ErrorObject::with_detail(ErrorCode::UnsupportedTool, name));
        };
        tracing::debug!(tool = %tool.name, "Executing tool");

        match tool.name.as_str() {
            CREATE_PROMPT_TOOL => Self::execute_create_prompt(store, arguments),
            _ => Err(ErrorObject::with_detail(ErrorCode::UnsupportedTool, name)),
        }
    }

    fn execute_create_prompt(
        store: &dyn PromptStorage,
        arguments: Value,
    ) -> std::result::Result<ToolResult, ErrorObject> {
        let args: CreatePromptArgs = super::protocol::parse_params(Some(arguments))?;

        if args.name.trim().is_empty() {
            return Err(ErrorObject::with_detail(
                ErrorCode::InvalidParams,
                "prompt name must not be empty",
            ));
        }

        let record = PromptRecord::new(args.name, args.content)
            .with_title(args.title)
            .with_description(args.description)
            .with_arguments(args.arguments)
            .with_tags(args.tags);
        let text = format!(
            "created new prompt with name '{}' and title '{}'",
            record.name, record.title
        );

        store.create(record).map_err(|e| match e {
            crate::Error::InvalidInput(detail) => {
                ErrorObject::with_detail(ErrorCode::InvalidParams, detail)
            },
            other => {
                tracing::error!(error = %other, "Failed to create prompt");
                ErrorObject::with_detail(ErrorCode::GeneralFailure, other)
            },
        })?;

        Ok(ToolResult::text(text))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Human-readable display name.
    pub title: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// A successful result with one text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Arguments for the `create_prompt` tool.
#[derive(Debug, Default, Deserialize)]
struct CreatePromptArgs {
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    arguments: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}
