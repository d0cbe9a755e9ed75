//! Prompt storage backends.
//!
//! Prompt records are kept in a directory of markdown files with YAML front
//! matter, fronted by an in-memory cache:
//!
//! | Provider | Location |
//! |----------|----------|
//! | Filesystem | `~/.config/prompter/prompts/{name}.md` |
//!
//! The cache and the file index are guarded by a single lock, so every
//! cached record has exactly one backing file and vice versa.

mod filesystem;
pub mod front_matter;
mod traits;

pub use filesystem::{FilesystemPromptStorage, PROMPT_FILE_EXTENSION};
pub use traits::PromptStorage;

use crate::config::{StorageConfig, StorageProvider};
use crate::{Error, Result};
use std::sync::Arc;

/// Factory for creating prompt storage from configuration.
pub struct PromptStorageFactory;

impl PromptStorageFactory {
    /// Creates the configured prompt storage.
    ///
    /// The prompts directory is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or scanned.
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn PromptStorage>> {
        match config.provider {
            StorageProvider::Filesystem => {
                let dir = &config.filesystem.prompts_directory;
                std::fs::create_dir_all(dir).map_err(|e| Error::OperationFailed {
                    operation: "create_prompt_dir".to_string(),
                    cause: format!("{}: {e}", dir.display()),
                })?;
                let storage = FilesystemPromptStorage::open(dir)?;
                Ok(Arc::new(storage))
            },
        }
    }
}
