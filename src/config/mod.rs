//! Configuration System for tripleflat
//!
//! Provides a layered configuration system supporting:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple config file locations
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./tripleflat.toml` - Project-local configuration
//! 2. `~/.config/tripleflat/config.toml` - User configuration (XDG)
//! 3. `~/.tripleflat/config.toml` - User configuration (legacy)
//! 4. `/etc/tripleflat/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `TRIPLEFLAT_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `TRIPLEFLAT_FORMAT` - Default output format (tsv, turtle, json)
//! - `TRIPLEFLAT_STRICT` - Reject malformed statements (true/false)
//! - `TRIPLEFLAT_PREFIX_MATCH` - Prefix matching mode (first, longest)
//! - `TRIPLEFLAT_DELIMITER` - Column delimiter for tabular output
//! - `TRIPLEFLAT_FALLBACK_NS` - Namespace for generated identifiers without a base
//!
//! # Example Configuration
//!
//! ```toml
//! # tripleflat.toml
//!
//! [general]
//! format = "turtle"
//! log_level = "normal"
//!
//! [parse]
//! strictness = "permissive"
//! prefix_match = "first"
//!
//! [output]
//! delimiter = "\t"
//! header = true
//! fallback_namespace = "http://www.example-domain.org#"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::ns;
use crate::parser::{ParseOptions, PrefixMatch, Strictness};

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlattenConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Pipeline settings
    pub parse: ParseConfig,
    /// Renderer settings
    pub output: OutputConfig,
}

/// General configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format (tsv, turtle, json)
    pub format: OutputFormat,
    /// Logging level
    pub log_level: LogLevel,
}

/// Pipeline configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParseConfig {
    /// Whether malformed statements are errors or warnings
    pub strictness: Strictness,
    /// How abbreviations are located in components
    pub prefix_match: PrefixMatch,
}

impl ParseConfig {
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            strictness: self.strictness,
            prefix_match: self.prefix_match,
        }
    }
}

/// Renderer configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Column delimiter for tabular output
    pub delimiter: String,
    /// Write the `Subject/Predicate/Object` header line
    pub header: bool,
    /// Namespace for generated identifiers when no base is declared
    pub fallback_namespace: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: "\t".to_string(),
            header: true,
            fallback_namespace: ns::FALLBACK_BASE.to_string(),
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Turtle,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Turtle => "turtle",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tsv" | "csv" | "table" | "tabular" => Some(OutputFormat::Tsv),
            "turtle" | "ttl" => Some(OutputFormat::Turtle),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Default `tracing` filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "warn",
            LogLevel::Verbose => "info",
            LogLevel::Debug => "debug",
        }
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl FlattenConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from default locations
    ///
    /// Searches [`FlattenConfig::config_paths`] in order, then applies
    /// environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                config = Self::load_from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(PathBuf::from("<string>"), e.to_string()))
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Project-local
        paths.push(PathBuf::from("./tripleflat.toml"));

        // XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tripleflat").join("config.toml"));
        }

        // Legacy home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".tripleflat").join("config.toml"));
        }

        // System-wide (Unix only)
        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/tripleflat/config.toml"));

        paths
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any `TRIPLEFLAT_*` lookup
    ///
    /// Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("TRIPLEFLAT_LOG_LEVEL") {
            if let Some(level) = LogLevel::from_str(&val) {
                self.general.log_level = level;
            }
        }

        if let Some(val) = lookup("TRIPLEFLAT_FORMAT") {
            if let Some(format) = OutputFormat::from_str(&val) {
                self.general.format = format;
            }
        }

        if let Some(val) = lookup("TRIPLEFLAT_STRICT") {
            if let Ok(strictness) = val.parse::<Strictness>() {
                self.parse.strictness = strictness;
            }
        }

        if let Some(val) = lookup("TRIPLEFLAT_PREFIX_MATCH") {
            if let Ok(mode) = val.parse::<PrefixMatch>() {
                self.parse.prefix_match = mode;
            }
        }

        if let Some(val) = lookup("TRIPLEFLAT_DELIMITER") {
            self.output.delimiter = unescape_delimiter(&val);
        }

        if let Some(val) = lookup("TRIPLEFLAT_FALLBACK_NS") {
            self.output.fallback_namespace = val;
        }
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# tripleflat configuration file

[general]
# Default output format: tsv, turtle, json
format = "tsv"
# Logging level: quiet, normal, verbose, debug
log_level = "normal"

[parse]
# strict: malformed statements abort the run
# permissive: they are logged, skipped where needed, and parsing continues
strictness = "permissive"
# first: first declared prefix found anywhere in a component
# longest: longest declared prefix the component starts with
prefix_match = "first"

[output]
# Column delimiter for tabular output
delimiter = "\t"
# Write the Subject/Predicate/Object header line
header = true
# Namespace for generated identifiers when the document declares no base
fallback_namespace = "http://www.example-domain.org#"
"#
    }
}

/// Accept the escaped spellings of common delimiters (`\t`, `\n`)
pub fn unescape_delimiter(raw: &str) -> String {
    match raw {
        "\\t" | "tab" => "\t".to_string(),
        "\\n" => "\n".to_string(),
        _ => raw.to_string(),
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading config file
    IoError(PathBuf, String),
    /// Parse error in config file
    ParseError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, msg) => {
                write!(f, "IO error reading {}: {}", path.display(), msg)
            }
            ConfigError::ParseError(path, msg) => {
                write!(f, "Parse error in {}: {}", path.display(), msg)
            }        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================
