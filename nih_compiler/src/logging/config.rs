//! Logging limits generated at build time plus the runtime preferences

use super::events::LogLevel;
use crate::config::compile_time::logging::*;
use crate::config::runtime::{self, LoggingPreferences};
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences. Only the first call wins.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Logging preferences already initialized".to_string())
}

/// Installed preferences, or the environment defaults
fn preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn min_log_level() -> LogLevel {
    match preferences().min_log_level {
        runtime::LogLevel::Error => LogLevel::Error,
        runtime::LogLevel::Warning => LogLevel::Warning,
        runtime::LogLevel::Info => LogLevel::Info,
        runtime::LogLevel::Debug => LogLevel::Debug,
    }
}

pub fn use_structured_logging() -> bool {
    preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    preferences().enable_console_logging
}

pub fn log_performance_events() -> bool {
    preferences().log_performance_events
}

pub fn use_cargo_style_output() -> bool {
    preferences().enable_cargo_style_output
}

pub fn buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn max_events_per_source() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

pub fn max_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Reject generated limits that would make the buffers useless
pub fn validate_config() -> Result<(), String> {
    if !(100..=100_000).contains(&LOG_BUFFER_SIZE) {
        return Err(format!(
            "Log buffer size {} outside 100..=100000",
            LOG_BUFFER_SIZE
        ));
    }

    if MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err("Max log events per source exceeds the total buffer size".to_string());
    }

    if MAX_LOG_MESSAGE_LENGTH < 16 {
        return Err(format!(
            "Max log message length {} is too short",
            MAX_LOG_MESSAGE_LENGTH
        ));
    }

    Ok(())
}

/// Preferences behind `nihc --verbose`
pub fn verbose_preferences() -> LoggingPreferences {
    LoggingPreferences {
        use_structured_logging: false,
        enable_console_logging: true,
        min_log_level: runtime::LogLevel::Debug,
        log_performance_events: true,
        enable_cargo_style_output: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(buffer_size() >= max_events_per_source());
        assert!(max_message_length() >= 16);
    }

    #[test]
    fn test_verbose_preferences_enable_debug() {
        let prefs = verbose_preferences();
        assert_eq!(prefs.min_log_level, runtime::LogLevel::Debug);
        assert!(prefs.enable_console_logging);
        assert!(prefs.enable_cargo_style_output);
    }
}
