//! Protocol error codes.
//!
//! Every error reply carries one code from [`ErrorCode`]:
//!
//! | Variant | Code | Message |
//! |---------|------|---------|
//! | `GeneralFailure` | -32603 | internal server failure |
//! | `ParseFailure` | -32700 | failed to parse the json-rpc message |
//! | `UnsupportedVersion` | -32000 | unsupported json-rpc version |
//! | `UnsupportedMethod` | -32601 | unsupported json-rpc method |
//! | `UnsupportedPrompt` | -32001 | unsupported prompt capability |
//! | `UnsupportedTool` | -32002 | unsupported tools capability |
//! | `InvalidParams` | -32602 | missing or invalid parameters |
//! | `NotFound` | -32004 | requested item could not be found |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Enumerated protocol error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unexpected server-side failure.
    GeneralFailure,
    /// The inbound message is not a valid envelope.
    ParseFailure,
    /// The envelope declares a protocol version other than `2.0`.
    UnsupportedVersion,
    /// The requested method is not implemented.
    UnsupportedMethod,
    /// The requested prompt capability is not implemented.
    UnsupportedPrompt,
    /// The requested tool is not implemented.
    UnsupportedTool,
    /// Parameters are missing or malformed.
    InvalidParams,
    /// The requested record does not exist.
    NotFound,
}

impl ErrorCode {
    /// All codes.
    pub const ALL: [Self; 8] = [
        Self::GeneralFailure,
        Self::ParseFailure,
        Self::UnsupportedVersion,
        Self::UnsupportedMethod,
        Self::UnsupportedPrompt,
        Self::UnsupportedTool,
        Self::InvalidParams,
        Self::NotFound,
    ];

    /// Returns the numeric code sent on the wire.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::GeneralFailure => -32603,
            Self::ParseFailure => -32700,
            Self::UnsupportedVersion => -32000,
            Self::UnsupportedMethod => -32601,
            Self::UnsupportedPrompt => -32001,
            Self::UnsupportedTool => -32002,
            Self::InvalidParams => -32602,
            Self::NotFound => -32004,
        }
    }

    /// Returns the fixed human-readable message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::GeneralFailure => "internal server failure",
            Self::ParseFailure => "failed to parse the json-rpc message",
            Self::UnsupportedVersion => "unsupported json-rpc version",
            Self::UnsupportedMethod => "unsupported json-rpc method",
            Self::UnsupportedPrompt => "unsupported prompt capability",
            Self::UnsupportedTool => "unsupported tools capability",
            Self::InvalidParams => "missing or invalid parameters",
            Self::NotFound => "requested item could not be found",
        }
    }

    /// Looks up the variant for a numeric code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

/// Error member of a reply envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric code from [`ErrorCode`].
    pub code: i32,
    /// Fixed message, optionally followed by `": <detail>"`.
    pub message: String,
    /// Optional structured data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Creates an error with the code's fixed message.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_string(),
            data: None,
        }
    }

    /// Creates an error whose message carries extra detail.
    #[must_use]
    pub fn with_detail(code: ErrorCode, detail: impl fmt::Display) -> Self {
        Self {
            code: code.code(),
            message: format!("{}: {detail}", code.message()),
            data: None,
        }
    }

    /// Returns the enumerated code, if the numeric code is one of ours.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }
}

impl From<ErrorCode> for ErrorObject {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl From<crate::Error> for ErrorObject {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::NotFound(detail) => Self::with_detail(ErrorCode::NotFound, detail),
            crate::Error::InvalidInput(detail) => {
                Self::with_detail(ErrorCode::InvalidParams, detail)
            },
            other => Self::with_detail(ErrorCode::GeneralFailure, other),
        }
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}
