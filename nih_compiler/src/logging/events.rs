//! Log events

use super::codes::{self, Code};
use crate::utils::Span;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
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
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Registry classification copied onto error events when they are serialized
#[derive(Debug, Serialize)]
struct ErrorDetails {
    category: &'static str,
    severity: &'static str,
    requires_halt: bool,
    recommended_action: &'static str,
}

/// One record handed to a logger backend
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    #[serde(serialize_with = "serialize_code")]
    pub code: Code,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

fn serialize_code<S: serde::Serializer>(code: &Code, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(code.as_str())
}

impl LogEvent {
    fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: truncate_message(message),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    /// Warnings carry the generic W000 code
    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, Code::new("I000"), message)
    }

    /// Info event tagged with a milestone code
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn recommended_action(&self) -> Option<&'static str> {
        codes::get_error_metadata(self.code.as_str()).map(|meta| meta.recommended_action)
    }

    /// `[LEVEL] CODE - message at line:col`
    pub fn format(&self) -> String {
        let position = self
            .span
            .map(|span| format!(" at {}:{}", span.start.line, span.start.column))
            .unwrap_or_default();

        format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code,
            self.message,
            position
        )
    }

    /// One JSON object; errors also carry their registry classification
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_value(self)?;

        if self.is_error() {
            if let Some(meta) = codes::get_error_metadata(self.code.as_str()) {
                json["error"] = serde_json::to_value(ErrorDetails {
                    category: meta.category,
                    severity: meta.severity.as_str(),
                    requires_halt: meta.requires_halt,
                    recommended_action: meta.recommended_action,
                })?;
            }
        }

        serde_json::to_string(&json)
    }
}

fn truncate_message(message: &str) -> String {
    let max_len = super::config::max_message_length();
    if message.len() <= max_len {
        return message.to_string();
    }

    let mut cut = max_len;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &message[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "File not found");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E005");
        assert_eq!(event.category(), "FileProcessing");
        assert!(event.recommended_action().is_some());
    }

    #[test]
    fn test_success_event_is_info() {
        let event = LogEvent::success(codes::success::TOKENIZATION_COMPLETE, "Tokenized");
        assert!(event.is_info());
        assert_eq!(event.code.as_str(), "I020");
    }

    #[test]
    fn test_format_includes_position() {
        let span = Span::new(Position::new(4, 2, 3), Position::new(8, 2, 7));
        let event =
            LogEvent::error(codes::syntax::UNKNOWN_HEAD_SYMBOL, "Unknown head").with_span(span);
        assert_eq!(event.format(), "[ERROR] E043 - Unknown head at 2:3");
    }

    #[test]
    fn test_json_carries_classification() {
        let event = LogEvent::error(codes::emission::UNHANDLED_NODE, "Unhandled node 'plist'")
            .with_context("tag", "plist");

        let json: serde_json::Value = serde_json::from_str(&event.format_json().unwrap()).unwrap();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["code"], "E060");
        assert_eq!(json["context"]["tag"], "plist");
        assert_eq!(json["error"]["category"], "Emission");
        assert_eq!(json["error"]["requires_halt"], true);
        assert!(json.get("span").is_none());
    }

    #[test]
    fn test_info_json_has_no_classification() {
        let json: serde_json::Value =
            serde_json::from_str(&LogEvent::info("Compiling").format_json().unwrap()).unwrap();
        assert_eq!(json["level"], "INFO");
        assert!(json.get("error").is_none());
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let long = "é".repeat(super::super::config::max_message_length());
        let event = LogEvent::info(&long);
        assert!(event.message.ends_with("..."));
        assert!(event.message.len() < long.len());
    }
}
