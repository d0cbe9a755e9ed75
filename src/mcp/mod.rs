//! MCP server implementation.
//!
//! Serves the prompt store over the Model Context Protocol.
//!
//! ## Features
//!
//! - **Tools**: `create_prompt`
//! - **Prompts**: every record in the store, rendered on `prompts/get`
//!
//! ## Usage
//!
//! ### Stdio Transport
//!
//! ```bash
//! prompter serve
//! ```
//!
//! ### Client Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "prompter": {
//!       "command": "prompter",
//!       "args": ["serve"]
//!     }
//!   }
//! }
//! ```

mod dispatch;
mod error;
#[cfg(feature = "http")]
pub mod http;
mod prompts;
mod protocol;
mod server;
mod tools;

pub use dispatch::McpMethod;
pub use error::{ErrorCode, ErrorObject};
pub use prompts::{GetPromptResult, PromptArgument, PromptContent, PromptDefinition, PromptMessage};
pub use protocol::{
    CallToolParams, GetPromptParams, InitializeParams, JSONRPC_VERSION, Message, RequestId,
    Response, parse_params,
};
pub use server::{
    DEFAULT_HTTP_PORT, McpServer, PROTOCOL_VERSION, SERVER_NAME, SERVER_TITLE,
    SUPPORTED_PROTOCOL_VERSIONS, Transport,
};
pub use tools::{CREATE_PROMPT_TOOL, ToolContent, ToolDefinition, ToolRegistry, ToolResult};
