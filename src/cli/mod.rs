//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run as MCP server (stdio or streamable HTTP) |
//! | `prompt` | Prompt template management |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Run as MCP server
//! prompter serve
//!
//! # Save a prompt template
//! prompter prompt save --name greet --arguments who "Hello {{ .who }}"
//!
//! # Render it
//! prompter prompt get greet --var who=World
//! ```

mod config;
mod prompt;
mod serve;

pub use config::cmd_config;
pub use prompt::{
    OutputFormat, SavePromptArgs, cmd_prompt_delete, cmd_prompt_get, cmd_prompt_list,
    cmd_prompt_save,
};
pub use serve::{ServeOptions, build_server, cmd_serve};
