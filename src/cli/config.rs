//! Config CLI command.

#![allow(clippy::print_stdout)]

use crate::config::PrompterConfig;
use std::path::Path;

/// Prints the effective configuration as YAML.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn cmd_config(
    config: &PrompterConfig,
    source: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# Built-in defaults"),
    }
    print!("{}", config.to_yaml()?);
    Ok(())
}
