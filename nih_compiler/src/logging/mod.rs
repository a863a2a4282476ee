//! Global logging for the NIH compiler
//!
//! A process-wide `LoggingService` plus an `ErrorCollector` that groups
//! events by the source being compiled. Logging stays beside the compile
//! result: the pipeline returns its errors as values and only reports them
//! here.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::config::runtime::LoggingPreferences;
use std::cell::RefCell;
use std::sync::OnceLock;

pub use codes::Code;
pub use collector::{ErrorCollector, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<LoggingService> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<ErrorCollector> = OnceLock::new();

thread_local! {
    static CURRENT_SOURCE: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Start logging with the preferences found in the environment
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Logging configuration invalid: {}", e))?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::file_processing::FILE_NOT_FOUND,
        codes::lexical::INVALID_CHARACTER,
        codes::syntax::UNEXPECTED_TOKEN,
        codes::emission::UNHANDLED_NODE,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    GLOBAL_LOGGER
        .set(LoggingService::from_preferences())
        .map_err(|_| "Global logger already initialized".to_string())?;
    GLOBAL_ERROR_COLLECTOR
        .set(ErrorCollector::new())
        .map_err(|_| "Global error collector already initialized".to_string())?;

    dispatch(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging initialized",
    ));
    Ok(())
}

/// Start logging with explicit preferences, e.g. from `--config` or `--verbose`
pub fn init_global_logging_with_preferences(
    preferences: LoggingPreferences,
) -> Result<(), String> {
    config::init_runtime_preferences(preferences)?;
    init_global_logging()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get()
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR.get()
}

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Run `f` with every event on this thread attributed to `source`
pub fn with_source_context<F, R>(source: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    if let Some(collector) = try_get_global_error_collector() {
        collector.record_source(source);
    }

    let previous = CURRENT_SOURCE.with(|slot| slot.replace(Some(source.to_string())));
    let result = f();
    CURRENT_SOURCE.with(|slot| *slot.borrow_mut() = previous);
    result
}

pub fn current_source() -> Option<String> {
    CURRENT_SOURCE.with(|slot| slot.borrow().clone())
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Deliver an event: attribute it to the current source, log it, and keep
/// errors and warnings for the end-of-run report
pub fn dispatch(event: LogEvent) {
    let source = current_source();
    let event = match &source {
        Some(name) => event.with_context("source", name),
        None => event,
    };

    if let (Some(name), Some(collector)) = (&source, try_get_global_error_collector()) {
        if event.is_error() || event.is_warning() {
            collector.record_event(name, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Debug events are only worth building when the level admits them
pub fn debug_enabled() -> bool {
    config::min_log_level() >= LogLevel::Debug
}

// ============================================================================
// SUMMARY
// ============================================================================

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(ErrorCollector::summary)
        .unwrap_or_default()
}

/// Print the cargo-style report to stderr when it is enabled
pub fn print_cargo_style_summary() {
    if !config::use_cargo_style_output() {
        return;
    }
    if let Some(collector) = try_get_global_error_collector() {
        eprintln!("{}", collector.format_report());
    }
}
