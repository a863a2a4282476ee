//! Errors and warnings grouped by source, and the cargo-style report

use super::config;
use super::events::LogEvent;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingSummary {
    pub total_sources: usize,
    pub compiled: usize,
    pub failed: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub elapsed: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

/// Thread-safe store of error and warning events keyed by source name
pub struct ErrorCollector {
    events: Mutex<BTreeMap<String, Vec<LogEvent>>>,
    sources: Mutex<BTreeSet<String>>,
    started: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(BTreeMap::new()),
            sources: Mutex::new(BTreeSet::new()),
            started: Instant::now(),
        }
    }

    /// Note that a source entered the pipeline, so clean compiles are counted
    pub fn record_source(&self, source: &str) {
        self.sources.lock().unwrap().insert(source.to_string());
    }

    /// Record an event; past the per-source cap a single overflow warning is kept
    pub fn record_event(&self, source: &str, event: LogEvent) {
        let cap = config::max_events_per_source();
        let mut events = self.events.lock().unwrap();
        let bucket = events.entry(source.to_string()).or_default();

        match bucket.len().cmp(&cap) {
            std::cmp::Ordering::Less => bucket.push(event),
            std::cmp::Ordering::Equal => bucket.push(LogEvent::warning(&format!(
                "Further events for this source dropped (limit: {})",
                cap
            ))),
            std::cmp::Ordering::Greater => {}
        }
    }

    pub fn events_for(&self, source: &str) -> Vec<LogEvent> {
        let events = self.events.lock().unwrap();
        events.get(source).cloned().unwrap_or_default()
    }

    pub fn summary(&self) -> ProcessingSummary {
        let events = self.events.lock().unwrap();
        let sources = self.sources.lock().unwrap();

        let mut summary = ProcessingSummary {
            elapsed: self.started.elapsed(),
            ..Default::default()
        };

        let names: BTreeSet<&String> = events.keys().chain(sources.iter()).collect();
        for name in names {
            let bucket = events.get(name).map(Vec::as_slice).unwrap_or(&[]);
            let errors = bucket.iter().filter(|e| e.is_error()).count();

            summary.total_sources += 1;
            summary.total_errors += errors;
            summary.total_warnings += bucket.iter().filter(|e| e.is_warning()).count();
            if errors > 0 {
                summary.failed += 1;
            } else {
                summary.compiled += 1;
            }
        }

        summary
    }

    /// Render the collected events the way cargo reports build problems
    pub fn format_report(&self) -> String {
        let mut output = String::new();
        let events = self.events.lock().unwrap().clone();

        for (source, bucket) in &events {
            let reported: Vec<&LogEvent> = bucket
                .iter()
                .filter(|e| e.is_error() || e.is_warning())
                .collect();
            if reported.is_empty() {
                continue;
            }

            output.push_str(&format!("Compiling {}\n", source));
            for event in reported {
                format_event(&mut output, source, event);
            }
            output.push('\n');
        }

        let summary = self.summary();
        output.push_str(&format!(
            "{} source(s): {} compiled, {} failed",
            summary.total_sources, summary.compiled, summary.failed
        ));
        if summary.total_errors > 0 {
            output.push_str(&format!(", {} error(s)", summary.total_errors));
        }
        if summary.total_warnings > 0 {
            output.push_str(&format!(", {} warning(s)", summary.total_warnings));
        }

        output
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn format_event(output: &mut String, source: &str, event: &LogEvent) {
    let kind = if event.is_error() { "error" } else { "warning" };
    output.push_str(&format!("{}[{}]: {}\n", kind, event.code, event.message));

    if let Some(span) = event.span {
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            source, span.start.line, span.start.column
        ));
    }

    for (key, value) in event.context.iter().filter(|(k, _)| k.as_str() != "source") {
        output.push_str(&format!("  = {}: {}\n", key, value));
    }

    if event.is_error() {
        if let Some(action) = event.recommended_action() {
            output.push_str(&format!("  = help: {}\n", action));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_events_grouped_by_source() {
        let collector = ErrorCollector::new();

        collector.record_event("a.nih", LogEvent::error(codes::syntax::EMPTY_LIST, "Empty list"));
        collector.record_event("b.nih", LogEvent::warning("odd"));

        assert_eq!(collector.events_for("a.nih").len(), 1);
        assert_eq!(collector.events_for("b.nih").len(), 1);
        assert!(collector.events_for("c.nih").is_empty());
    }

    #[test]
    fn test_summary_counts_clean_sources() {
        let collector = ErrorCollector::new();
        collector.record_source("ok.nih");
        collector.record_source("bad.nih");
        collector.record_event(
            "bad.nih",
            LogEvent::error(codes::lexical::INVALID_CHARACTER, "Invalid character"),
        );

        let summary = collector.summary();
        assert_eq!(summary.total_sources, 2);
        assert_eq!(summary.compiled, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_errors());
    }

    #[test]
    fn test_per_source_cap() {
        let collector = ErrorCollector::new();
        let cap = config::max_events_per_source();

        for _ in 0..cap + 5 {
            collector.record_event("noisy.nih", LogEvent::warning("noise"));
        }

        let kept = collector.events_for("noisy.nih");
        assert_eq!(kept.len(), cap + 1);
        assert!(kept[cap].message.contains("dropped"));
    }

    #[test]
    fn test_cargo_style_report() {
        let collector = ErrorCollector::new();
        let span = Span::new(Position::new(1, 1, 2), Position::new(5, 1, 6));

        collector.record_event(
            "demo.nih",
            LogEvent::error(codes::syntax::UNKNOWN_HEAD_SYMBOL, "Unknown head symbol 'frob'")
                .with_span(span)
                .with_context("head", "frob")
                .with_context("source", "demo.nih"),
        );

        let report = collector.format_report();
        assert!(report.contains("Compiling demo.nih\n"));
        assert!(report.contains("error[E043]: Unknown head symbol 'frob'\n  --> demo.nih:1:2"));
        assert!(report.contains("  = head: frob"));
        assert!(!report.contains("  = source:"));
        assert!(report.contains("  = help: "));
        assert!(report.ends_with("1 source(s): 0 compiled, 1 failed, 1 error(s)"));
    }
}
