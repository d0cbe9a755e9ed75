//! Filesystem-backed prompt storage.
//!
//! Stores each prompt as a markdown file with YAML front matter:
//! `{base_path}/{prompt_name}.md`. The directory is scanned once when the
//! store is opened; after that the in-memory cache is the source of truth
//! and the files are only written, never read.

use super::PromptStorage;
use super::front_matter;
use crate::models::{PromptQuery, PromptRecord};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::NamedTempFile;

/// Extension of prompt files written by the store.
pub const PROMPT_FILE_EXTENSION: &str = "md";

/// Cache and file index. Guarded together so they never disagree.
#[derive(Debug, Default)]
struct StoreState {
    /// Records keyed by identifier.
    cache: BTreeMap<String, PromptRecord>,
    /// Backing file names keyed by identifier. The first file holds the
    /// cached record; any others declare the same name and were found at
    /// startup.
    files: BTreeMap<String, Vec<String>>,
}

/// Filesystem-based prompt storage with an in-memory cache.
///
/// Every mutating operation holds the write lock across both the file I/O
/// and the cache update, so a slow disk serializes all store access.
#[derive(Debug)]
pub struct FilesystemPromptStorage {
    /// Directory holding prompt files.
    base_path: PathBuf,
    /// Cache and file index.
    state: RwLock<StoreState>,
}

impl FilesystemPromptStorage {
    /// Opens a store over an existing directory and loads every prompt file.
    ///
    /// Files that fail to parse are logged and skipped. Hidden files (such
    /// as temporaries left behind by an interrupted write) are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        tracing::info!(path = %base_path.display(), "Loading prompts from filesystem");

        let state = load_state(&base_path)?;
        tracing::info!(
            path = %base_path.display(),
            prompts = state.cache.len(),
            "Prompt cache populated"
        );

        Ok(Self {
            base_path,
            state: RwLock::new(state),
        })
    }

    /// Returns the default prompts directory.
    ///
    /// Returns `~/.config/prompter/prompts/`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| {
            d.home_dir()
                .join(".config")
                .join("prompter")
                .join("prompts")
        })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the number of cached prompts.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_state()?.cache.len())
    }

    /// Returns true if no prompts are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|e| Error::OperationFailed {
            operation: "lock_prompt_store".to_string(),
            cause: e.to_string(),
        })
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|e| Error::OperationFailed {
            operation: "lock_prompt_store".to_string(),
            cause: e.to_string(),
        })
    }

    /// Writes a record to disk and into the cache. Shared by create and update.
    fn save(&self, mut record: PromptRecord) -> Result<()> {
        validate_name(&record.name)?;
        record.id = record.derived_id().to_string();

        let file_name = format!("{}.{PROMPT_FILE_EXTENSION}", record.id);
        let text = front_matter::serialize(&record)?;

        let mut state = self.write_state()?;

        self.write_prompt_file(&file_name, &text)?;

        let previous = state
            .files
            .insert(record.id.clone(), vec![file_name.clone()])
            .unwrap_or_default();
        // Files loaded at startup under other names.
        for stale in previous.into_iter().filter(|f| *f != file_name) {
            if let Err(e) = self.remove_prompt_file(&record.id, &stale) {
                tracing::warn!(
                    prompt = %record.id,
                    file = %stale,
                    error = %e,
                    "Failed to remove superseded prompt file"
                );
                if let Some(files) = state.files.get_mut(&record.id) {
                    files.push(stale);
                }
            }
        }

        tracing::debug!(prompt = %record.id, file = %file_name, "Prompt saved");
        state.cache.insert(record.id.clone(), record);

        Ok(())
    }

    /// Writes a file via a temporary sibling and an atomic rename.
    fn write_prompt_file(&self, file_name: &str, text: &str) -> Result<()> {
        let write_failed = |e: io::Error| Error::OperationFailed {
            operation: "write_prompt_file".to_string(),
            cause: format!("{file_name}: {e}"),
        };

        let mut temp = NamedTempFile::new_in(&self.base_path).map_err(write_failed)?;
        temp.write_all(text.as_bytes()).map_err(write_failed)?;
        temp.as_file().sync_all().map_err(write_failed)?;
        temp.persist(self.base_path.join(file_name))
            .map_err(|e| write_failed(e.error))?;

        Ok(())
    }

    /// Removes one backing file. A file that is already gone counts as removed.
    fn remove_prompt_file(&self, id: &str, file_name: &str) -> Result<()> {
        match fs::remove_file(self.base_path.join(file_name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(prompt = %id, file = %file_name, "Prompt file already gone");
                Ok(())
            },
            Err(e) => Err(Error::OperationFailed {
                operation: "delete_prompt_file".to_string(),
                cause: format!("{file_name}: {e}"),
            }),
        }
    }
}

impl PromptStorage for FilesystemPromptStorage {
    fn create(&self, record: PromptRecord) -> Result<()> {
        self.save(record)
    }

    fn read(&self, id: &str) -> Result<PromptRecord> {
        self.read_state()?
            .cache
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no prompt with id '{id}'")))
    }

    fn update(&self, record: PromptRecord) -> Result<()> {
        self.save(record)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.write_state()?;

        let Some(file_names) = state.files.get(id).cloned() else {
            return Err(Error::NotFound(format!("no prompt file for id '{id}'")));
        };

        // Duplicates go first, so a failure leaves the primary file and the
        // cached record in place.
        for (removed, file_name) in file_names.iter().rev().enumerate() {
            if let Err(e) = self.remove_prompt_file(id, file_name) {
                let remaining = file_names.len() - removed;
                if let Some(files) = state.files.get_mut(id) {
                    files.truncate(remaining);
                }
                return Err(e);
            }
        }

        state.files.remove(id);
        state.cache.remove(id);
        tracing::debug!(prompt = %id, "Prompt deleted");

        Ok(())
    }

    fn list(&self, _query: &PromptQuery) -> Result<Vec<PromptRecord>> {
        Ok(self.read_state()?.cache.values().cloned().collect())
    }
}

/// Rejects names that cannot serve as a file stem inside the store directory.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("prompt name must not be empty".to_string()));
    }
    if name.starts_with('.') || name.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidInput(format!(
            "prompt name '{name}' must not start with '.' or contain path separators"
        )));
    }
    Ok(())
}

/// Scans a directory and parses every visible `*.md` file.
fn load_state(dir: &Path) -> Result<StoreState> {
    let entries = fs::read_dir(dir).map_err(|e| Error::OperationFailed {
        operation: "read_prompt_dir".to_string(),
        cause: format!("{}: {e}", dir.display()),
    })?;

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            },
        };
        let Ok(file_name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        if file_name.starts_with('.')
            || Path::new(&file_name).extension().is_none_or(|ext| ext != PROMPT_FILE_EXTENSION)
        {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        files.push((file_name, entry.path()));
    }
    files.sort();

    let mut state = StoreState::default();
    for (file_name, path) in files {
        tracing::debug!(file = %path.display(), "Loading prompt file");

        let record = match read_prompt_file(&path) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping unparsable prompt file");
                continue;
            },
        };

        let canonical = format!("{}.{PROMPT_FILE_EXTENSION}", record.id);
        match state.files.get_mut(&record.id) {
            Some(existing) => {
                tracing::warn!(
                    prompt = %record.id,
                    file = %file_name,
                    "Duplicate prompt name across files"
                );
                if file_name == canonical {
                    existing.insert(0, file_name);
                    state.cache.insert(record.id.clone(), record);
                } else {
                    existing.push(file_name);
                }
            },
            None => {
                state.files.insert(record.id.clone(), vec![file_name]);
                state.cache.insert(record.id.clone(), record);
            },
        }
    }

    Ok(state)
}

/// Reads and parses one prompt file.
fn read_prompt_file(path: &Path) -> Result<PromptRecord> {
    let text = fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_prompt_file".to_string(),
        cause: e.to_string(),
    })?;

    front_matter::parse(&text)
}
