//! MCP method names.
//!
//! Inbound method strings are parsed once into [`McpMethod`], a closed enum,
//! so `McpServer::dispatch` routes with an exhaustive `match`. Anything the
//! server does not implement lands in [`McpMethod::Unknown`] and is answered
//! with [`McpMethod::unsupported_error`].

use super::error::{ErrorCode, ErrorObject};
use std::fmt;

/// Namespace prefix of prompt methods.
const PROMPTS_NAMESPACE: &str = "prompts/";

/// A method the server routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum McpMethod {
    /// `initialize`
    Initialize,
    /// `notifications/initialized`
    Initialized,
    /// `ping`
    Ping,
    /// `tools/list`
    ListTools,
    /// `tools/call`
    CallTool,
    /// `prompts/list`
    ListPrompts,
    /// `prompts/get`
    GetPrompt,
    /// Any other method name, kept verbatim.
    Unknown(String),
}

impl McpMethod {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Initialize => "initialize",
            Self::Initialized => "notifications/initialized",
            Self::Ping => "ping",
            Self::ListTools => "tools/list",
            Self::CallTool => "tools/call",
            Self::ListPrompts => "prompts/list",
            Self::GetPrompt => "prompts/get",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Error reply for a method without a handler.
    ///
    /// Names in the `prompts/` namespace report
    /// [`ErrorCode::UnsupportedPrompt`]; everything else reports
    /// [`ErrorCode::UnsupportedMethod`].
    #[must_use]
    pub fn unsupported_error(&self) -> ErrorObject {
        let code = if self.as_str().starts_with(PROMPTS_NAMESPACE) {
            ErrorCode::UnsupportedPrompt
        } else {
            ErrorCode::UnsupportedMethod
        };
        ErrorObject::with_detail(code, self.as_str())
    }
}

impl From<&str> for McpMethod {
    fn from(s: &str) -> Self {
        match s {
            "initialize" => Self::Initialize,
            "notifications/initialized" => Self::Initialized,
            "ping" => Self::Ping,
            "tools/list" => Self::ListTools,
            "tools/call" => Self::CallTool,
            "prompts/list" => Self::ListPrompts,
            "prompts/get" => Self::GetPrompt,
            unknown => Self::Unknown(unknown.to_string()),
        }
    }
}

impl fmt::Display for McpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("initialize", McpMethod::Initialize)]
    #[test_case("notifications/initialized", McpMethod::Initialized)]
    #[test_case("ping", McpMethod::Ping)]
    #[test_case("tools/list", McpMethod::ListTools)]
    #[test_case("tools/call", McpMethod::CallTool)]
    #[test_case("prompts/list", McpMethod::ListPrompts)]
    #[test_case("prompts/get", McpMethod::GetPrompt)]
    fn test_parse_known_method(name: &str, expected: McpMethod) {
        let method = McpMethod::from(name);
        assert_eq!(method, expected);
        assert_eq!(method.as_str(), name);
    }

    #[test_case("resources/list", ErrorCode::UnsupportedMethod ; "other namespace")]
    #[test_case("Ping", ErrorCode::UnsupportedMethod ; "case sensitive")]
    #[test_case("prompts/delete", ErrorCode::UnsupportedPrompt ; "prompt namespace")]
    fn test_unsupported_error(name: &str, code: ErrorCode) {
        let method = McpMethod::from(name);
        assert_eq!(method, McpMethod::Unknown(name.to_string()));

        let error = method.unsupported_error();
        assert_eq!(error.code, code.code());
        assert!(error.message.ends_with(name), "{}", error.message);
    }
}
