//! Source location tracking
//!
//! Tokens and AST nodes carry byte-offset spans whose endpoints are already
//! resolved to 1-based line/column pairs. `SourceMap` owns the line-start
//! table the lexer builds while scanning and renders caret diagnostics.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based, counted in chars)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span of source text `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Zero-width span at a position
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Create a span from byte offsets only (line/column left at 0)
    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };

        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };

        Self { start, end }
    }

    /// Byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Source text covered by this span
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.offset..self.end.offset]
    }

    /// Placeholder span for synthesized values
    pub fn dummy() -> Self {
        Self {
            start: Position::start(),
            end: Position::start(),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A value with its source location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Map the value while preserving the span
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Resolve `offset` against a sorted line-start table beginning with 0.
///
/// The table only needs to cover lines up to `offset`, so a scanner can
/// resolve positions while it is still recording line starts.
pub fn resolve_position(source: &str, line_starts: &[usize], offset: usize) -> Position {
    let offset = offset.min(source.len());
    let line = line_starts
        .binary_search(&offset)
        .unwrap_or_else(|i| i.saturating_sub(1));

    let line_start = line_starts.get(line).copied().unwrap_or(0);
    let column = source
        .get(line_start..offset)
        .map(|s| s.chars().count())
        .unwrap_or(offset - line_start);

    Position::new(offset, (line + 1) as u32, (column + 1) as u32)
}

/// Line-start table over a source buffer
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// The original source text
    pub source: String,
    /// Byte offsets of line starts, always beginning with 0
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Build a source map by scanning the text for newlines
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Adopt a line-start table recorded during lexing.
    ///
    /// The table is sorted and deduplicated so lookups stay valid even if a
    /// scanner recorded the same line twice.
    pub fn from_line_starts(source: String, mut line_starts: Vec<usize>) -> Self {
        line_starts.push(0);
        line_starts.sort_unstable();
        line_starts.dedup();
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolve a byte offset to a 1-based line and column
    pub fn position_at(&self, offset: usize) -> Position {
        resolve_position(&self.source, &self.line_starts, offset)
    }

    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// Resolved span between two byte offsets
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.position_at(start), self.position_at(end))
    }

    /// Get a line of text by line number (1-based), without its newline
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());

        self.source.get(start..end)
    }

    /// Render a diagnostic with source context:
    ///
    /// ```text
    /// error: message
    ///   --> file.nih:2:5
    ///    |
    ///  2 | (let x
    ///    |     ^
    /// ```
    pub fn format_error(&self, filename: &str, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}:{}\n",
            filename, span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = span.start.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!(" {} |\n", padding));
            result.push_str(&format!(" {} | {}\n", line_num_str, line));

            let line_width = line.chars().count();
            let lead = (span.start.column as usize).saturating_sub(1);
            let caret_count = if span.start.line == span.end.line {
                (span.end.column.saturating_sub(span.start.column)) as usize
            } else {
                line_width.saturating_sub(lead)
            };

            result.push_str(&format!(
                " {} | {}{}\n",
                padding,
                " ".repeat(lead),
                "^".repeat(caret_count.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_lookup_uses_line_starts() {
        let map = SourceMap::new("(let x 1)\n(let y 2)\n".to_string());
        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(5), Position::new(5, 1, 6));
        assert_eq!(map.position_at(10), Position::new(10, 2, 1));
        assert_eq!(map.position_at(15), Position::new(15, 2, 6));
    }

    #[test]
    fn test_recorded_line_starts_match_scanned() {
        let text = "a\nbb\nccc".to_string();
        let scanned = SourceMap::new(text.clone());
        let recorded = SourceMap::from_line_starts(text, vec![2, 5, 5]);
        assert_eq!(scanned.line_count(), recorded.line_count());
        for offset in 0..8 {
            assert_eq!(scanned.position_at(offset), recorded.position_at(offset));
        }
    }

    #[test]
    fn test_get_line() {
        let map = SourceMap::new("first\nsecond\n".to_string());
        assert_eq!(map.get_line(1), Some("first"));
        assert_eq!(map.get_line(2), Some("second"));
        assert_eq!(map.get_line(3), Some(""));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(9), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("(let x 1)\n(frob y)\n".to_string());
        let span = map.span(11, 15);
        let rendered = map.format_error("demo.nih", &span, "unknown head symbol 'frob'");

        assert!(rendered.starts_with("error: unknown head symbol 'frob'\n"));
        assert!(rendered.contains("  --> demo.nih:2:2\n"));
        assert!(rendered.contains(" 2 | (frob y)\n"));
        assert!(rendered.ends_with("   |  ^^^^\n"));
    }

    #[test]
    fn test_empty_span_gets_single_caret() {
        let map = SourceMap::new("(let x".to_string());
        let span = map.span(6, 6);
        let rendered = map.format_error("t.nih", &span, "unexpected end of input");
        assert!(rendered.ends_with("   |       ^\n"));
    }

    #[test]
    fn test_span_merge() {
        let map = SourceMap::new("(call f 1 2)".to_string());
        let merged = map.span(6, 7).merge(map.span(10, 11));
        assert_eq!(merged.start.offset, 6);
        assert_eq!(merged.end.offset, 11);
        assert_eq!(merged.slice(&map.source), "f 1 2");
    }
}
