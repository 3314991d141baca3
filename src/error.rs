//! Structured Error Handling for tripleflat
//!
//! Provides a unified error type with:
//! - Error codes for programmatic handling
//! - Structured error reports (JSON-friendly)
//! - Context preservation through error chains
//!
//! # Error Categories
//!
//! - Parse errors (1xxx) - structural problems in the input document
//! - Input/output errors (5xxx) - reading documents, writing results
//! - Config errors (7xxx) - configuration file issues
//! - Internal errors (9xxx) - broken pipeline invariants
//!
//! # Example
//!
//! ```rust,ignore
//! use tripleflat::error::{FlattenError, ErrorCode};
//!
//! fn flatten(path: &str, input: &str) -> Result<usize, FlattenError> {
//!     let doc = tripleflat::parse(input).map_err(|e| FlattenError::from(e).at(path))?;
//!     if doc.warnings().len() > 10 {
//!         return Err(FlattenError::new(ErrorCode::ParseError, "Too many malformed statements")
//!             .with_context("warnings", doc.warnings().len().to_string()));
//!     }
//!     Ok(doc.triples().len())
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::parser::ParseError;

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Parse errors (1xxx)
    /// Generic parse error
    ParseError = 1000,
    /// Closing bracket without an opener
    UnbalancedBracket = 1001,
    /// Opening bracket never closed
    UnclosedBracket = 1002,
    /// Statement with fewer than three tokens
    MalformedStatement = 1003,
    /// `;` group or object with the wrong number of tokens
    MalformedGroup = 1004,
    /// Trailing statement without a terminating `.`
    UnterminatedStatement = 1005,

    // Input/output errors (5xxx)
    /// Generic I/O error
    IoError = 5000,
    /// Input file not found
    FileNotFound = 5001,
    /// File access denied
    FileAccessDenied = 5002,
    /// Rendering or writing output failed
    OutputFailed = 5004,

    // Config errors (7xxx)
    /// Generic config error
    ConfigError = 7000,
    /// Config file not found
    ConfigNotFound = 7001,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,

    // Internal errors (9xxx)
    /// Internal error
    InternalError = 9000,
    /// A placeholder token survived resolution
    UnresolvedPlaceholder = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::UnbalancedBracket => "Unbalanced bracket",
            ErrorCode::UnclosedBracket => "Unclosed bracket",
            ErrorCode::MalformedStatement => "Malformed statement",
            ErrorCode::MalformedGroup => "Malformed predicate/object group",
            ErrorCode::UnterminatedStatement => "Unterminated statement",

            ErrorCode::IoError => "I/O error",
            ErrorCode::FileNotFound => "File not found",
            ErrorCode::FileAccessDenied => "File access denied",
            ErrorCode::OutputFailed => "Output failed",

            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ConfigNotFound => "Configuration file not found",
            ErrorCode::InvalidConfigSyntax => "Invalid configuration syntax",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::UnresolvedPlaceholder => "Unresolved placeholder",
        }
    }

    /// Process exit status for errors of this family
    pub fn exit_status(&self) -> i32 {
        match self.code() / 1000 {
            1 => 65, // EX_DATAERR
            5 => 74, // EX_IOERR
            7 => 78, // EX_CONFIG
            _ => 70, // EX_SOFTWARE
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// Source location (file, or file:offset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Stack of error causes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the context
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add a cause to the error chain
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for tripleflat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FlattenError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add a cause to the error chain
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.causes.push(cause.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Process exit status for this error
    pub fn exit_status(&self) -> i32 {
        self.code.exit_status()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL_ERROR","message":"{}"}}"#, self.message)
        })
    }
}

impl fmt::Display for FlattenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
            if !ctx.causes.is_empty() {
                write!(f, "\nCaused by:")?;
                for cause in &ctx.causes {
                    write!(f, "\n  - {}", cause)?;
                }
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for FlattenError {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<ParseError> for FlattenError {
    fn from(err: ParseError) -> Self {
        let message = err.to_string();
        match err {
            ParseError::UnbalancedBracket { bracket, position } => {
                FlattenError::parse(message).with_code(ErrorCode::UnbalancedBracket)
                    .with_context("bracket", bracket.to_string())
                    .with_context("position", position.to_string())
                    .with_hint("Remove the stray bracket or add its opener")
            }
            ParseError::UnclosedBracket { bracket, position } => {
                FlattenError::parse(message).with_code(ErrorCode::UnclosedBracket)
                    .with_context("bracket", bracket.to_string())
                    .with_context("position", position.to_string())
                    .with_hint("Close every '(' and '[' before the end of the document")
            }
            ParseError::MalformedStatement { statement } => {
                FlattenError::parse(message).with_code(ErrorCode::MalformedStatement)
                    .with_context("statement", statement)
                    .with_hint("Statements need a subject, a predicate and an object")
            }
            ParseError::MalformedGroup { group, expected, found } => {
                FlattenError::parse(message).with_code(ErrorCode::MalformedGroup)
                    .with_context("group", group)
                    .with_context("expected", expected.to_string())
                    .with_context("found", found.to_string())
                    .with_hint("Run without --strict to keep the first tokens and continue")
            }
            ParseError::UnterminatedStatement { statement } => {
                FlattenError::parse(message).with_code(ErrorCode::UnterminatedStatement)
                    .with_context("statement", statement)
                    .with_hint("End the last statement with ' .'")
            }
            ParseError::UnresolvedPlaceholder { token } => {
                FlattenError::new(ErrorCode::UnresolvedPlaceholder, message)
                    .with_context("token", token)
            }
        }
    }
}

impl From<ConfigError> for FlattenError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        match err {
            ConfigError::IoError(path, _) => FlattenError::config(message)
                .with_code(ErrorCode::ConfigNotFound)
                .at(path.display().to_string()),
            ConfigError::ParseError(path, _) => FlattenError::config(message)
                .with_code(ErrorCode::InvalidConfigSyntax)
                .at(path.display().to_string())
                .with_hint("Run with --print-config to see a valid configuration"),
        }
    }
}

impl From<std::io::Error> for FlattenError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::FileNotFound,
            ErrorKind::PermissionDenied => ErrorCode::FileAccessDenied,
            _ => ErrorCode::IoError,
        };
        FlattenError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for FlattenError {
    fn from(err: serde_json::Error) -> Self {
        FlattenError::new(ErrorCode::OutputFailed, err.to_string()).with_context("format", "JSON")
    }
}

impl From<toml::de::Error> for FlattenError {
    fn from(err: toml::de::Error) -> Self {
        FlattenError::config(err.to_string()).with_code(ErrorCode::InvalidConfigSyntax)
    }
}

/// A Result type using FlattenError
pub type FlattenResult<T> = Result<T, FlattenError>;

// ============================================================================
// Tests
// ============================================================================
