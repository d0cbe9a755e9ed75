//! MCP server setup and lifecycle.
//!
//! Implements a JSON-RPC based MCP server over stdio or streamable HTTP.
//! Transports hand each inbound message to [`McpServer::process`] and write
//! back whatever it returns; `None` means the message gets no reply.

use super::dispatch::McpMethod;
use super::error::{ErrorCode, ErrorObject};
use super::prompts::{GetPromptResult, PromptDefinition};
use super::protocol::{
    CallToolParams, GetPromptParams, InitializeParams, JSONRPC_VERSION, Message, Response,
    parse_params,
};
use super::tools::ToolRegistry;
use crate::models::PromptQuery;
use crate::storage::prompt::PromptStorage;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info_span;

/// Latest MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Protocol revisions a client may negotiate, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &[PROTOCOL_VERSION, "2025-03-26", "2024-11-05"];

/// Server name reported during initialization.
pub const SERVER_NAME: &str = "prompter";

/// Server title reported during initialization.
pub const SERVER_TITLE: &str = "Prompter - MCP Server for prompts";

/// Default port of the streamable HTTP transport.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Transport type for the MCP server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Standard input/output.
    #[default]
    #[value(name = "stdio")]
    Stdio,
    /// Streamable HTTP (`POST /mcp`).
    #[value(name = "streamable_http")]
    StreamableHttp,
}

impl Transport {
    /// Returns the configuration name of the transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::StreamableHttp => "streamable_http",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for method dispatch.
type DispatchResult = std::result::Result<Value, ErrorObject>;

/// MCP server for prompter.
pub struct McpServer {
    /// Prompt store shared with every handler.
    store: Arc<dyn PromptStorage>,
    /// Tool registry.
    tools: ToolRegistry,
    /// Transport type.
    transport: Transport,
    /// HTTP port (if using HTTP transport).
    port: u16,
}

impl McpServer {
    /// Creates a new MCP server over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn PromptStorage>) -> Self {
        Self {
            store,
            tools: ToolRegistry::new(),
            transport: Transport::default(),
            port: DEFAULT_HTTP_PORT,
        }
    }

    /// Sets the transport type.
    #[must_use]
    pub const fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the HTTP port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns the configured transport.
    #[must_use]
    pub const fn transport(&self) -> Transport {
        self.transport
    }

    /// Returns the prompt store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn PromptStorage> {
        &self.store
    }

    /// Starts the server on the configured transport and blocks until it stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, or
    /// [`Error::FeatureNotEnabled`] if HTTP was requested without the `http`
    /// feature.
    pub fn start(self) -> Result<()> {
        tracing::info!(transport = %self.transport, "Starting MCP server");
        match self.transport {
            Transport::Stdio => self.run_stdio(),
            Transport::StreamableHttp => self.run_http(),
        }
    }

    /// Runs the server over stdio.
    fn run_stdio(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve_lines(stdin.lock(), stdout.lock())
    }

    /// Runs the server over HTTP.
    #[cfg(feature = "http")]
    fn run_http(self) -> Result<()> {
        let port = self.port;
        super::http::serve(Arc::new(self), port)
    }

    /// Runs the server over HTTP (feature not enabled).
    #[cfg(not(feature = "http"))]
    #[allow(clippy::unused_self)]
    fn run_http(&self) -> Result<()> {
        Err(Error::FeatureNotEnabled("http".to_string()))
    }

    /// Serves line-delimited messages until the reader is exhausted.
    ///
    /// Blank lines are skipped. Each reply is written as one line and flushed
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn serve_lines<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::OperationFailed {
                    operation: "read_stdin".to_string(),
                    cause: e.to_string(),
                })?;
            if read == 0 {
                break;
            }

            // Invalid UTF-8 is replaced so the line fails JSON parsing and
            // gets a parse failure reply.
            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }

            let Some(reply) = self.process(&line) else {
                continue;
            };

            writeln!(writer, "{reply}").map_err(|e| Error::OperationFailed {
                operation: "write_stdout".to_string(),
                cause: e.to_string(),
            })?;

            writer.flush().map_err(|e| Error::OperationFailed {
                operation: "flush_stdout".to_string(),
                cause: e.to_string(),
            })?;
        }

        tracing::info!("Input closed, stopping MCP server");
        Ok(())
    }

    /// Processes one inbound message and returns the encoded reply, if any.
    ///
    /// Requests (messages with an `id`) always get exactly one reply.
    /// Notifications are dispatched but never answered.
    #[must_use]
    pub fn process(&self, line: &str) -> Option<String> {
        let span = info_span!(
            "mcp.request",
            transport = self.transport.as_str(),
            rpc.method = tracing::field::Empty,
            rpc.id = tracing::field::Empty,
            status = tracing::field::Empty
        );
        let _guard = span.enter();

        let message: Message = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                span.record("status", "parse_error");
                tracing::warn!(error = %e, "Failed to decode message");
                let error = ErrorObject::with_detail(ErrorCode::ParseFailure, e);
                return Some(Response::failure(None, error).to_line());
            },
        };

        if let Some(id) = &message.id {
            span.record("rpc.id", id.to_string().as_str());
        }
        let is_notification = message.is_notification();

        let Some(method_name) = message.method.as_deref() else {
            span.record("status", "parse_error");
            tracing::warn!("Message has no method");
            return message.id.map(|id| {
                let error = ErrorObject::with_detail(ErrorCode::ParseFailure, "missing method");
                Response::failure(Some(id), error).to_line()
            });
        };

        let method = McpMethod::from(method_name);
        span.record("rpc.method", method.as_str());

        let result = if message.jsonrpc == JSONRPC_VERSION {
            tracing::debug!(method = %method, "Processing MCP message");
            self.dispatch(&method, message.params)
        } else {
            Err(ErrorObject::with_detail(
                ErrorCode::UnsupportedVersion,
                format!("'{}'", message.jsonrpc),
            ))
        };

        let status_label = if result.is_ok() { "success" } else { "error" };
        span.record("status", status_label);

        if is_notification || method == McpMethod::Initialized {
            if let Err(e) = &result {
                tracing::debug!(method = %method, error = %e, "Notification failed");
            }
            return None;
        }

        let reply = match result {
            Ok(value) => Response::success(message.id, value),
            Err(error) => Response::failure(message.id, error),
        };
        Some(reply.to_line())
    }

    /// Routes a method to its handler.
    fn dispatch(&self, method: &McpMethod, params: Option<Value>) -> DispatchResult {
        match method {
            McpMethod::Initialize => Ok(Self::handle_initialize(params)),
            McpMethod::Initialized => {
                tracing::info!("Client finished initialization");
                Ok(serde_json::json!({}))
            },
            McpMethod::Ping => Ok(serde_json::json!({})),
            McpMethod::ListTools => self.handle_list_tools(),
            McpMethod::CallTool => self.handle_call_tool(params),
            McpMethod::ListPrompts => self.handle_list_prompts(),
            McpMethod::GetPrompt => self.handle_get_prompt(params),
            McpMethod::Unknown(_) => Err(method.unsupported_error()),
        }
    }

    /// Handles the initialize method.
    fn handle_initialize(params: Option<Value>) -> Value {
        let params: InitializeParams = parse_params(params).unwrap_or_default();
        let requested = params.protocol_version.unwrap_or_default();
        let protocol_version = SUPPORTED_PROTOCOL_VERSIONS
            .iter()
            .find(|v| **v == requested)
            .copied()
            .unwrap_or(PROTOCOL_VERSION);

        tracing::info!(
            requested = %requested,
            negotiated = protocol_version,
            "Initializing MCP session"
        );

        serde_json::json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "prompts": { "listChanged": true },
                "tools": { "listChanged": true }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "title": SERVER_TITLE,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    /// Handles tools/list.
    fn handle_list_tools(&self) -> DispatchResult {
        let tools = self.tools.list_tools();
        Ok(serde_json::json!({ "tools": to_value(&tools)? }))
    }

    /// Handles tools/call.
    fn handle_call_tool(&self, params: Option<Value>) -> DispatchResult {
        let params: CallToolParams = parse_params(params)?;
        if params.name.is_empty() {
            return Err(ErrorObject::with_detail(
                ErrorCode::InvalidParams,
                "missing tool name",
            ));
        }

        let span = info_span!("mcp.tool.call", tool.name = params.name.as_str());
        let _guard = span.enter();

        let result = self
            .tools
            .execute(self.store.as_ref(), &params.name, params.arguments)?;
        to_value(&result)
    }

    /// Handles prompts/list.
    fn handle_list_prompts(&self) -> DispatchResult {
        let records = self.store.list(&PromptQuery::all()).map_err(|e| {
            tracing::error!(error = %e, "Failed to list prompts");
            ErrorObject::with_detail(ErrorCode::GeneralFailure, e)
        })?;

        let prompts: Vec<PromptDefinition> = records.iter().map(PromptDefinition::from).collect();
        Ok(serde_json::json!({ "prompts": to_value(&prompts)? }))
    }

    /// Handles prompts/get.
    fn handle_get_prompt(&self, params: Option<Value>) -> DispatchResult {
        let params: GetPromptParams = parse_params(params)?;
        if params.name.is_empty() {
            return Err(ErrorObject::with_detail(
                ErrorCode::InvalidParams,
                "missing prompt name",
            ));
        }

        let span = info_span!("mcp.prompt.get", prompt.name = params.name.as_str());
        let _guard = span.enter();

        let record = self.store.read(&params.name).map_err(ErrorObject::from)?;
        to_value(&GetPromptResult::render(&record, &params.arguments))
    }
}

/// Serializes a handler result.
fn to_value<T: Serialize>(value: &T) -> DispatchResult {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize result");
        ErrorObject::with_detail(ErrorCode::GeneralFailure, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromptRecord;
    use crate::storage::prompt::FilesystemPromptStorage;
    use serde_json::json;
    use tempfile::TempDir;

    fn server() -> (TempDir, McpServer) {
        let dir = TempDir::new().unwrap();
        let store = FilesystemPromptStorage::open(dir.path()).unwrap();
        (dir, McpServer::new(Arc::new(store)))
    }

    fn call(server: &McpServer, request: &Value) -> Value {
        let reply = server.process(&request.to_string()).unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    #[test]
    fn test_mcp_server_creation() {
        let (_dir, server) = server();
        assert_eq!(server.transport(), Transport::Stdio);
        assert_eq!(server.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_with_transport() {
        let (_dir, server) = server();
        let server = server.with_transport(Transport::StreamableHttp).with_port(9000);
        assert_eq!(server.transport(), Transport::StreamableHttp);
        assert_eq!(server.port, 9000);
    }

    #[test]
    fn test_handle_initialize() {
        let (_dir, server) = server();
        let reply = call(
            &server,
            &json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2025-03-26"}}),
        );
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(reply["result"]["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(reply["result"]["capabilities"]["prompts"]["listChanged"], true);
    }

    #[test]
    fn test_initialize_falls_back_to_latest_version() {
        let (_dir, server) = server();
        let reply = call(
            &server,
            &json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "1999-01-01"}}),
        );
        assert_eq!(reply["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[test]
    fn test_handle_ping() {
        let (_dir, server) = server();
        let reply = server.process(r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#);
        assert_eq!(reply.as_deref(), Some(r#"{"jsonrpc":"2.0","id":3,"result":{}}"#));
    }

    #[test]
    fn test_initialized_notification_has_no_reply() {
        let (_dir, server) = server();
        assert!(
            server
                .process(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .is_none()
        );
        assert!(
            server
                .process(r#"{"jsonrpc":"2.0","id":4,"method":"notifications/initialized"}"#)
                .is_none()
        );
    }

    #[test]
    fn test_handle_unknown_method() {
        let (_dir, server) = server();
        let reply = call(&server, &json!({"jsonrpc": "2.0", "id": 5, "method": "resources/list"}));
        assert_eq!(reply["error"]["code"], ErrorCode::UnsupportedMethod.code());

        let reply = call(&server, &json!({"jsonrpc": "2.0", "id": 6, "method": "prompts/delete"}));
        assert_eq!(reply["error"]["code"], ErrorCode::UnsupportedPrompt.code());
    }

    #[test]
    fn test_unknown_notification_has_no_reply() {
        let (_dir, server) = server();
        assert!(server.process(r#"{"jsonrpc":"2.0","method":"bogus"}"#).is_none());
    }

    #[test]
    fn test_handle_parse_error() {
        let (_dir, server) = server();
        let reply: Value = serde_json::from_str(&server.process("not json").unwrap()).unwrap();
        assert_eq!(reply["id"], Value::Null);
        assert_eq!(reply["error"]["code"], ErrorCode::ParseFailure.code());
    }

    #[test]
    fn test_missing_method_correlates_id() {
        let (_dir, server) = server();
        let reply = call(&server, &json!({"jsonrpc": "2.0", "id": 8}));
        assert_eq!(reply["id"], 8);
        assert_eq!(reply["error"]["code"], ErrorCode::ParseFailure.code());

        assert!(server.process(r#"{"jsonrpc":"2.0"}"#).is_none());
    }

    #[test]
    fn test_wrong_version() {
        let (_dir, server) = server();
        let reply = call(&server, &json!({"jsonrpc": "1.0", "id": 9, "method": "ping"}));
        assert_eq!(reply["error"]["code"], ErrorCode::UnsupportedVersion.code());
    }

    #[test]
    fn test_handle_list_tools() {
        let (_dir, server) = server();
        let reply = call(&server, &json!({"jsonrpc": "2.0", "id": 10, "method": "tools/list"}));
        let tools = reply["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "create_prompt");
        assert!(tools[0]["inputSchema"]["properties"]["content"].is_object());
    }

    #[test]
    fn test_handle_get_prompt() {
        let (_dir, server) = server();
        server
            .store()
            .create(PromptRecord::new("hello", "Hello {{.name}}!").with_description("Says hi"))
            .unwrap();

        let reply = call(
            &server,
            &json!({"jsonrpc": "2.0", "id": 11, "method": "prompts/get", "params": {"name": "hello", "arguments": {"name": "Ada"}}}),
        );
        assert_eq!(reply["result"]["description"], "Says hi");
        assert_eq!(reply["result"]["messages"][0]["content"]["text"], "Hello Ada!");
    }

    #[test]
    fn test_get_prompt_not_found() {
        let (_dir, server) = server();
        let reply = call(
            &server,
            &json!({"jsonrpc": "2.0", "id": 12, "method": "prompts/get", "params": {"name": "nope"}}),
        );
        assert_eq!(reply["error"]["code"], ErrorCode::NotFound.code());
    }

    #[test]
    fn test_handle_missing_params() {
        let (_dir, server) = server();
        let reply = call(&server, &json!({"jsonrpc": "2.0", "id": 13, "method": "prompts/get"}));
        assert_eq!(reply["error"]["code"], ErrorCode::InvalidParams.code());

        let reply = call(&server, &json!({"jsonrpc": "2.0", "id": 14, "method": "tools/call"}));
        assert_eq!(reply["error"]["code"], ErrorCode::InvalidParams.code());
    }

    #[test]
    fn test_serve_lines_skips_blanks_and_notifications() {
        let (_dir, server) = server();
        let input = "\n{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n   \n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";
        let mut output = Vec::new();
        server.serve_lines(input.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\n");
    }

    #[test]
    fn test_serve_lines_survives_invalid_utf8() {
        let (_dir, server) = server();
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
        let mut output = Vec::new();
        server.serve_lines(input.as_slice(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let replies: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["id"], Value::Null);
        assert_eq!(replies[0]["error"]["code"], ErrorCode::ParseFailure.code());
        assert_eq!(replies[1], serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
    }

    #[test]
    fn test_transport_names() {
        assert_eq!(Transport::Stdio.to_string(), "stdio");
        assert_eq!(Transport::StreamableHttp.to_string(), "streamable_http");
    }
}
