//! Binary entry point for prompter.
//!
//! This binary provides the CLI interface for the prompter MCP server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use prompter::cli::{self, OutputFormat, SavePromptArgs, ServeOptions};
use prompter::config::{self, CONFIG_ENV_VAR, PrompterConfig};
use prompter::mcp::Transport;
use prompter::observability::{self, LoggingConfig};
use prompter::storage::prompt::{PromptStorage, PromptStorageFactory};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Prompter - An MCP server for reusable prompt templates.
#[derive(Parser)]
#[command(name = "prompter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start MCP server.
    Serve {
        /// Transport type (overrides the configuration file).
        #[arg(short, long, value_enum)]
        transport: Option<Transport>,

        /// Port for the streamable HTTP transport.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage prompt templates.
    Prompt {
        /// Prompt subcommand.
        #[command(subcommand)]
        action: PromptAction,
    },

    /// Show the effective configuration.
    Config,
}

/// Prompt subcommands.
#[derive(Subcommand)]
enum PromptAction {
    /// Save a prompt template.
    Save {
        /// Prompt name.
        #[arg(short, long)]
        name: String,

        /// Prompt content with {{ .argument }} placeholders.
        content: Option<String>,

        /// Display title.
        #[arg(long)]
        title: Option<String>,

        /// Description of the prompt.
        #[arg(short, long)]
        description: Option<String>,

        /// Tags for the prompt (comma-separated).
        #[arg(short, long)]
        tags: Option<String>,

        /// Argument names used by the content (comma-separated).
        #[arg(short, long)]
        arguments: Option<String>,

        /// Path to file containing the prompt content.
        #[arg(long, conflicts_with = "content")]
        from_file: Option<PathBuf>,
    },

    /// List saved prompts.
    List {
        /// Output format: table or json.
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Get a prompt by name, rendered with variables.
    Get {
        /// Prompt name.
        name: String,

        /// Variable values as KEY=VALUE.
        #[arg(long = "var")]
        variables: Vec<String>,

        /// Print the stored content without rendering.
        #[arg(long)]
        raw: bool,
    },

    /// Delete a prompt.
    Delete {
        /// Prompt name.
        name: String,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(config.log_file.clone(), config.log_format, cli.verbose);
    if let Err(e) = observability::init(logging) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: PrompterConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve { transport, port } => {
            cli::cmd_serve(&config, ServeOptions { transport, port })
        },
        Commands::Prompt { action } => cmd_prompt(&config, action),
        Commands::Config => {
            let source = cli
                .config
                .or_else(|| Some(config::default_config_path()).filter(|p| p.exists()));
            cli::cmd_config(&config, source.as_deref())
        },
    }
}

/// Loads configuration.
///
/// An explicit path (flag or environment) must exist; otherwise the default
/// location is used if present.
fn load_config(path: Option<&PathBuf>) -> Result<PrompterConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => {
            PrompterConfig::load_from_file(path).map_err(Into::into)
        },
        _ => PrompterConfig::load_default().map_err(Into::into),
    }
}

/// Opens the configured prompt store.
fn open_store(config: &PrompterConfig) -> Result<Arc<dyn PromptStorage>, Box<dyn std::error::Error>> {
    Ok(PromptStorageFactory::create(&config.storage)?)
}

/// Prompt command.
fn cmd_prompt(config: &PrompterConfig, action: PromptAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let store = store.as_ref();

    match action {
        PromptAction::Save {
            name,
            content,
            title,
            description,
            tags,
            arguments,
            from_file,
        } => cli::cmd_prompt_save(
            store,
            SavePromptArgs {
                name,
                content,
                title,
                description,
                tags,
                arguments,
                from_file,
            },
        ),
        PromptAction::List { format } => cli::cmd_prompt_list(store, OutputFormat::parse(&format)),
        PromptAction::Get {
            name,
            variables,
            raw,
        } => cli::cmd_prompt_get(store, name, variables, raw),
        PromptAction::Delete { name } => cli::cmd_prompt_delete(store, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_transport() {
        let cli = Cli::try_parse_from(["prompter", "serve", "--transport", "streamable_http", "--port", "9000"])
            .unwrap();
        match cli.command {
            Commands::Serve { transport, port } => {
                assert_eq!(transport, Some(Transport::StreamableHttp));
                assert_eq!(port, Some(9000));
            },
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_prompt_get_vars() {
        let cli = Cli::try_parse_from(["prompter", "prompt", "get", "greet", "--var", "a=1", "--var", "b=2"])
            .unwrap();
        match cli.command {
            Commands::Prompt {
                action: PromptAction::Get { name, variables, raw },
            } => {
                assert_eq!(name, "greet");
                assert_eq!(variables, vec!["a=1", "b=2"]);
                assert!(!raw);
            },
            _ => panic!("expected prompt get"),
        }
    }
}
