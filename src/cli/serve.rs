//! Serve CLI command (MCP server).

use crate::config::PrompterConfig;
use crate::mcp::{McpServer, Transport};
use crate::storage::prompt::PromptStorageFactory;

/// Overrides given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServeOptions {
    /// Transport override.
    pub transport: Option<Transport>,
    /// HTTP port override.
    pub port: Option<u16>,
}

/// Builds the server described by the configuration and options.
///
/// The prompts directory is created if missing and scanned once.
///
/// # Errors
///
/// Returns an error if the prompt store cannot be opened.
pub fn build_server(
    config: &PrompterConfig,
    options: ServeOptions,
) -> crate::Result<McpServer> {
    let store = PromptStorageFactory::create(&config.storage)?;
    let transport = options.transport.unwrap_or(config.transport.kind);
    let port = options.port.unwrap_or(config.transport.streamable_http.port);

    Ok(McpServer::new(store)
        .with_transport(transport)
        .with_port(port))
}

/// Runs the MCP server until its input closes.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the transport fails.
pub fn cmd_serve(
    config: &PrompterConfig,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let server = build_server(config, options)?;
    server.start()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_server_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let config = PrompterConfig::default().with_prompts_directory(dir.path().join("prompts"));

        let server = build_server(
            &config,
            ServeOptions {
                transport: Some(Transport::StreamableHttp),
                port: Some(9999),
            },
        )
        .unwrap();

        assert_eq!(server.transport(), Transport::StreamableHttp);
        assert!(dir.path().join("prompts").is_dir());
    }

    #[test]
    fn test_build_server_uses_config() {
        let dir = TempDir::new().unwrap();
        let config = PrompterConfig::default().with_prompts_directory(dir.path());

        let server = build_server(&config, ServeOptions::default()).unwrap();
        assert_eq!(server.transport(), config.transport.kind);
    }
}
