//! # Prompter
//!
//! A prompt template server for AI coding assistants.
//!
//! Prompter keeps reusable text prompts in a directory of markdown files and
//! serves them over the Model Context Protocol (MCP), a line-delimited
//! JSON-RPC 2.0 protocol spoken by AI tool integrations.
//!
//! ## Features
//!
//! - File-backed prompt store with an in-memory cache and startup recovery
//! - MCP dispatcher for `initialize`, `ping`, `tools/*` and `prompts/*`
//! - Placeholder rendering (`{{ .name }}`, `{{ date }}`) at request time
//! - Stdio transport, plus streamable HTTP behind the `http` feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use prompter::mcp::McpServer;
//! use prompter::storage::prompt::FilesystemPromptStorage;
//!
//! let store = FilesystemPromptStorage::open("/tmp/prompts")?;
//! let server = McpServer::new(Arc::new(store));
//! let reply = server.process(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
//! assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#));
//! # Ok::<(), prompter::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod mcp;
pub mod models;
pub mod observability;
pub mod rendering;
pub mod storage;

pub use config::PrompterConfig;
pub use mcp::McpServer;
pub use models::{PromptQuery, PromptRecord};
pub use storage::prompt::{FilesystemPromptStorage, PromptStorage};

/// Error type for prompter operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Empty or unsafe prompt names, malformed files, bad configuration |
/// | `NotFound` | Reading or deleting a prompt identifier the store does not know |
/// | `OperationFailed` | I/O errors, serialization failures, poisoned locks |
/// | `FeatureNotEnabled` | Selecting the HTTP transport without the `http` feature |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A prompt is written with an empty name or a name that is not a plain file stem
    /// - A prompt file has no front matter or malformed front matter
    /// - The configuration file uses a legacy or unknown layout
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested prompt does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur
    /// - YAML or JSON serialization fails
    /// - The store lock was poisoned by a panicking writer
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for prompter operations.
pub type Result<T> = std::result::Result<T, Error>;
