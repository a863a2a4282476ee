//! Logger backends and the level-filtering service in front of them

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Pick a backend from the installed preferences.
    ///
    /// Console output goes to stderr; with console logging off, events are
    /// only buffered so a compile run stays silent.
    pub fn from_preferences() -> Self {
        let logger: Arc<dyn Logger> = match (
            config::use_console_logging(),
            config::use_structured_logging(),
        ) {
            (false, _) => Arc::new(MemoryLogger::new()),
            (true, true) => Arc::new(StructuredLogger),
            (true, false) => Arc::new(ConsoleLogger),
        };

        Self::new(logger, config::min_log_level())
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// `[LEVEL] CODE - message` lines on stderr
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        let mut line = event.format();
        for (key, value) in &event.context {
            line.push_str(&format!(" {}={}", key, value));
        }
        eprintln!("{}", line);
    }
}

/// One JSON object per line on stderr
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", event.format()),
        }
    }
}

/// Ring buffer of the most recent events
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_code(&self, code: Code) -> bool {
        self.events.lock().unwrap().iter().any(|e| e.code == code)
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.events.lock().unwrap();
        if events.len() == self.capacity {
            events.remove(0);
        }
        events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger_keeps_newest() {
        let logger = MemoryLogger::with_capacity(2);

        logger.log(&LogEvent::info("first"));
        logger.log(&LogEvent::error(codes::lexical::INVALID_CHARACTER, "Invalid character '@'"));
        logger.log(&LogEvent::success(codes::success::TOKENIZATION_COMPLETE, "Tokenized"));

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.events()[0].code, codes::lexical::INVALID_CHARACTER);
        assert!(logger.contains_code(codes::success::TOKENIZATION_COMPLETE));
    }

    #[test]
    fn test_service_filters_by_level() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Info);

        service.log_event(LogEvent::debug("Token dump"));
        service.log_event(LogEvent::info("Compiling"));
        service.log_event(LogEvent::error(codes::syntax::EMPTY_LIST, "Empty list"));

        assert_eq!(logger.len(), 2);
        assert!(logger.contains_code(codes::syntax::EMPTY_LIST));
        assert!(!service.should_log(LogLevel::Debug));
    }

    #[test]
    fn test_stderr_loggers_do_not_panic() {
        let event = LogEvent::error(codes::syntax::UNKNOWN_HEAD_SYMBOL, "Unknown head 'frob'")
            .with_context("head", "frob");
        ConsoleLogger.log(&event);
        StructuredLogger.log(&event);
    }
}
