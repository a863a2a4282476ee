// RUNTIME PREFERENCES (User Experience)
//
// Hard limits live in `compile_time` (generated by build.rs). Everything here
// only changes how much gets reported, never what the compiler accepts.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Read a boolean preference from the environment, falling back to `default`
fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to require the .nih extension
    pub require_nih_extension: bool,

    /// Whether to log size and timing details after loading a file
    pub enable_performance_logging: bool,

    /// Whether to log a debug note for files without the .nih extension
    pub log_non_nih_processing: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_nih_extension: env_flag(env_vars::REQUIRE_NIH_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
            log_non_nih_processing: env_flag(env_vars::LOG_NON_NIH_PROCESSING, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-class token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to log string length statistics
    pub log_string_statistics: bool,

    /// Whether to track operator usage patterns
    pub track_operator_patterns: bool,

    /// Whether to log every dialect switch caused by a pragma
    pub log_dialect_switches: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            log_string_statistics: env_flag(env_vars::LEXICAL_LOG_STRING_STATS, false),
            track_operator_patterns: env_flag(env_vars::LEXICAL_TRACK_OPERATORS, false),
            log_dialect_switches: env_flag(env_vars::LEXICAL_LOG_DIALECT_SWITCHES, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterPreferences {
    /// Whether to prepend the library shim to the generated code
    pub include_library_prelude: bool,

    /// Whether `doc` forms are kept as comments in the output
    pub emit_doc_comments: bool,
}

impl Default for EmitterPreferences {
    fn default() -> Self {
        Self {
            include_library_prelude: env_flag(env_vars::EMITTER_INCLUDE_PRELUDE, true),
            emit_doc_comments: env_flag(env_vars::EMITTER_DOC_COMMENTS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to include performance metrics in logs
    pub log_performance_events: bool,

    /// Whether to print the cargo-style summary after a run
    pub enable_cargo_style_output: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_flag(env_vars::LOGGING_LOG_PERFORMANCE, true),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// All runtime preferences, loadable from an optional `nih.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub emitter: EmitterPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text. Missing sections and keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load preferences from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_NIH_EXTENSION: &str = "NIH_REQUIRE_NIH_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "NIH_ENABLE_PERFORMANCE_LOGGING";
    pub const LOG_NON_NIH_PROCESSING: &str = "NIH_LOG_NON_NIH_PROCESSING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "NIH_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_STRING_STATS: &str = "NIH_LEXICAL_LOG_STRING_STATS";
    pub const LEXICAL_TRACK_OPERATORS: &str = "NIH_LEXICAL_TRACK_OPERATORS";
    pub const LEXICAL_LOG_DIALECT_SWITCHES: &str = "NIH_LEXICAL_LOG_DIALECT_SWITCHES";

    // Emitter
    pub const EMITTER_INCLUDE_PRELUDE: &str = "NIH_EMITTER_INCLUDE_PRELUDE";
    pub const EMITTER_DOC_COMMENTS: &str = "NIH_EMITTER_DOC_COMMENTS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "NIH_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "NIH_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "NIH_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "NIH_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_CARGO_STYLE: &str = "NIH_LOGGING_CARGO_STYLE";
}
