//! Configuration management.
//!
//! Configuration is read from YAML, rooted at a `prompter` key:
//!
//! ```yaml
//! prompter:
//!   transport:
//!     type: stdio            # or streamable_http
//!     streamable_http:
//!       port: 8080
//!   logFile: ~/.config/prompter/prompter.log
//!   logFormat: pretty        # or json
//!   storage:
//!     provider: filesystem
//!     filesystem:
//!       prompts_directory: ~/.config/prompter/prompts
//! ```
//!
//! Every key is optional. Paths starting with `~/` are resolved against the
//! home directory.

use crate::mcp::{DEFAULT_HTTP_PORT, Transport};
use crate::observability::LogFormat;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "PROMPTER_CONFIG";

/// Configuration file name inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "prompter.yaml";

/// Root key of the configuration document.
const ROOT_KEY: &str = "prompter";

/// Main configuration for prompter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrompterConfig {
    /// Transport settings.
    pub transport: TransportConfig,
    /// Log file; `None` logs to stderr.
    #[serde(rename = "logFile")]
    pub log_file: Option<PathBuf>,
    /// Log line format.
    #[serde(rename = "logFormat")]
    pub log_format: LogFormat,
    /// Storage settings.
    pub storage: StorageConfig,
}

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Transport type.
    #[serde(rename = "type")]
    pub kind: Transport,
    /// Streamable HTTP settings.
    pub streamable_http: StreamableHttpConfig,
}

/// Streamable HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamableHttpConfig {
    /// Listening port.
    pub port: u16,
}

impl Default for StreamableHttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage provider.
    pub provider: StorageProvider,
    /// Filesystem provider settings.
    pub filesystem: FilesystemStorageConfig,
}

/// Available storage providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageProvider {
    /// Markdown files in a directory.
    #[default]
    Filesystem,
}

/// Filesystem provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemStorageConfig {
    /// Directory holding prompt files.
    pub prompts_directory: PathBuf,
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            prompts_directory: default_config_dir().join("prompts"),
        }
    }
}

impl Default for PrompterConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            log_file: Some(default_config_dir().join("prompter.log")),
            log_format: LogFormat::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Configuration document wrapper.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    prompter: PrompterConfig,
}

impl PrompterConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for malformed YAML, legacy layouts
    /// (`prompter.http`, or a scalar `prompter.transport`), or unknown
    /// transport types and storage providers.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(contents)
            .map_err(|e| Error::InvalidInput(format!("invalid configuration: {e}")))?;

        if value.is_null() {
            return Ok(Self::default());
        }
        reject_legacy_layout(&value)?;

        let file: ConfigFile = serde_yaml_ng::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("invalid configuration: {e}")))?;

        Ok(file.prompter.resolve_home())
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from the default location.
    ///
    /// Reads `~/.config/prompter/prompter.yaml` if it exists; otherwise
    /// returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the default file exists but cannot be parsed.
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Renders the configuration as a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(&ConfigFile {
            prompter: self.clone(),
        })
        .map_err(|e| Error::OperationFailed {
            operation: "serialize_config".to_string(),
            cause: e.to_string(),
        })
    }

    /// Sets the prompts directory.
    #[must_use]
    pub fn with_prompts_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.filesystem.prompts_directory = path.into();
        self
    }

    fn resolve_home(mut self) -> Self {
        self.log_file = self
            .log_file
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| expand_home(&p));
        self.storage.filesystem.prompts_directory =
            expand_home(&self.storage.filesystem.prompts_directory);
        self
    }
}

/// Rejects configuration layouts that are no longer supported.
fn reject_legacy_layout(value: &serde_yaml_ng::Value) -> Result<()> {
    let Some(root) = value.get(ROOT_KEY) else {
        return Ok(());
    };

    if root.get("http").is_some() {
        return Err(Error::InvalidInput(
            "'prompter.http' is no longer supported; use 'prompter.transport.streamable_http'"
                .to_string(),
        ));
    }

    if let Some(transport) = root.get("transport") {
        if !transport.is_mapping() && !transport.is_null() {
            return Err(Error::InvalidInput(
                "'prompter.transport' must be a mapping with a 'type' key".to_string(),
            ));
        }
    }

    Ok(())
}

/// Returns `~/.config/prompter`, or `.prompter` if no home directory is known.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".prompter"),
        |d| d.home_dir().join(".config").join("prompter"),
    )
}

/// Returns the default configuration file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}

/// Replaces a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    directories::BaseDirs::new().map_or_else(|| path.to_path_buf(), |d| d.home_dir().join(rest))
}
