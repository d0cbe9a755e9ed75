//! Prompt storage trait definition.

use crate::Result;
use crate::models::{PromptQuery, PromptRecord};

/// Trait for prompt storage backends.
///
/// Implementations must be safe to call from several threads at once.
pub trait PromptStorage: Send + Sync {
    /// Creates a prompt record.
    ///
    /// The identifier is derived from the record's name. An existing record
    /// with the same identifier is overwritten; callers that need uniqueness
    /// must check with [`PromptStorage::read`] first.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable or the record cannot be
    /// persisted.
    fn create(&self, record: PromptRecord) -> Result<()>;

    /// Reads a prompt by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no record has this identifier.
    fn read(&self, id: &str) -> Result<PromptRecord>;

    /// Overwrites a prompt record.
    ///
    /// Same mechanics as [`PromptStorage::create`]; the record does not have
    /// to exist beforehand.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable or the record cannot be
    /// persisted.
    fn update(&self, record: PromptRecord) -> Result<()>;

    /// Deletes a prompt by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no backing file is known for the
    /// identifier, or an I/O error if the file cannot be removed.
    fn delete(&self, id: &str) -> Result<()>;

    /// Lists prompt records.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be accessed.
    fn list(&self, query: &PromptQuery) -> Result<Vec<PromptRecord>>;
}
