//! Core lexical analyzer
//!
//! `LexerState` owns one scan over one source buffer. Each loop iteration
//! tries the branches in a fixed order (newline, number, string, comments,
//! annotation, operator, keyword, pragma, identifier, whitespace) and the
//! first branch that applies consumes input. Operators are tried before
//! whitespace so spaced table entries such as `" + "` can match.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::langdef::{self, Match};
use crate::logging::codes;
use crate::tokens::{Dialect, DialectSwitch, Token, TokenClass, TokenStream};
use crate::utils::span::resolve_position;
use crate::utils::{Position, SourceMap, Span, Spanned};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::HashMap;

/// Lexical analysis errors. Every variant aborts the scan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Carriage return in source, only LF line endings are accepted")]
    CarriageReturn { span: Span },

    #[error("Lexer made no progress at offset {offset}")]
    NoProgress { offset: usize, span: Span },

    #[error("Invalid character: '{character}'")]
    InvalidCharacter { character: char, span: Span },

    #[error("Unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("Unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, span: Span },

    #[error("String too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, span: Span },

    #[error("Comment too long: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize, span: Span },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, span: Span },

    #[error("Block comments nested too deep: {depth} (max {MAX_COMMENT_NESTING_DEPTH})")]
    CommentNestingTooDeep { depth: usize, span: Span },

    #[error("Unknown pragma '{pragma}', expected '#lang = nih-sexpr' or '#lang = nih-c'")]
    UnknownPragma { pragma: String, span: Span },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::CarriageReturn { .. } => codes::lexical::CARRIAGE_RETURN,
            LexerError::NoProgress { .. } => codes::lexical::NO_PROGRESS,
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::CommentNestingTooDeep { .. } => codes::lexical::COMMENT_NESTING_TOO_DEEP,
            LexerError::UnknownPragma { .. } => codes::lexical::UNKNOWN_PRAGMA,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LexerError::CarriageReturn { span }
            | LexerError::NoProgress { span, .. }
            | LexerError::InvalidCharacter { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::UnterminatedComment { span }
            | LexerError::IdentifierTooLong { span, .. }
            | LexerError::StringTooLarge { span, .. }
            | LexerError::CommentTooLong { span, .. }
            | LexerError::TooManyTokens { span, .. }
            | LexerError::CommentNestingTooDeep { span, .. }
            | LexerError::UnknownPragma { span, .. } => *span,
        }
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn help(&self) -> Option<String> {
        match self {
            LexerError::CarriageReturn { .. } => {
                Some("convert the file to LF line endings".to_string())
            }
            LexerError::UnterminatedString { .. } => {
                Some("close the string with the quote that opened it".to_string())
            }
            LexerError::UnterminatedComment { .. } => {
                Some("every '/*' needs a matching '*/', including nested ones".to_string())
            }
            _ => None,
        }
    }
}

/// Scan statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub operator_tokens: usize,
    pub string_tokens: usize,
    pub number_tokens: usize,
    pub annotated_tokens: usize,
    pub comment_count: usize,
    pub max_comment_length: usize,
    pub max_comment_depth: usize,
    pub max_string_length: usize,
    pub line_count: usize,
    pub dialect_switches: usize,

    // Only filled when `track_operator_patterns` is on
    pub operator_usage_patterns: HashMap<String, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        if token.type_annotation.is_some() {
            self.annotated_tokens += 1;
        }

        match token.class {
            TokenClass::Keyword => self.keyword_tokens += 1,
            TokenClass::Identifier => self.identifier_tokens += 1,
            TokenClass::StringLiteral => self.string_tokens += 1,
            TokenClass::NumberLiteral => self.number_tokens += 1,
            TokenClass::Operator => {
                self.operator_tokens += 1;
                if preferences.track_operator_patterns {
                    *self
                        .operator_usage_patterns
                        .entry(token.text.clone())
                        .or_insert(0) += 1;
                }
            }
            TokenClass::TypeAnnotation | TokenClass::Eof => {}
        }
    }

    pub(crate) fn record_string_length(&mut self, length: usize, preferences: &LexicalPreferences) {
        self.max_string_length = self.max_string_length.max(length);

        if preferences.log_string_statistics {
            log_debug!("String literal processed",
                "length" => length,
                "max_so_far" => self.max_string_length
            );
        }
    }

    pub(crate) fn record_comment(&mut self, length: usize, depth: usize) {
        self.comment_count += 1;
        self.max_comment_length = self.max_comment_length.max(length);
        self.max_comment_depth = self.max_comment_depth.max(depth);
    }
}

/// A `:name` annotation waiting for the next token
#[derive(Debug, Clone)]
struct PendingAnnotation {
    name: String,
    start: usize,
    end: usize,
}

/// Mutable state of a single scan
pub struct LexerState {
    source: String,
    offset: usize,
    line_starts: Vec<usize>,
    /// Open offsets of the block comments currently being skipped
    comment_stack: Vec<usize>,
    tokens: Vec<Spanned<Token>>,
    pending_annotation: Option<PendingAnnotation>,
    dialect: Dialect,
    dialect_switches: Vec<DialectSwitch>,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

impl LexerState {
    pub fn new(source: impl Into<String>, preferences: LexicalPreferences) -> Self {
        Self {
            source: source.into(),
            offset: 0,
            line_starts: vec![0],
            comment_stack: Vec::new(),
            tokens: Vec::new(),
            pending_annotation: None,
            dialect: Dialect::default(),
            dialect_switches: Vec::new(),
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Scan the whole buffer
    pub fn run(mut self) -> Result<(TokenStream, LexicalMetrics), LexerError> {
        self.check_line_endings()?;

        let mut last_offset = None;
        while self.offset < self.source.len() {
            if last_offset == Some(self.offset) {
                return Err(LexerError::NoProgress {
                    offset: self.offset,
                    span: self.span(self.offset, self.offset),
                });
            }
            last_offset = Some(self.offset);
            self.scan_next()?;
        }

        self.finish()
    }

    // === POSITIONS ===

    fn position(&self, offset: usize) -> Position {
        resolve_position(&self.source, &self.line_starts, offset)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.position(start), self.position(end))
    }

    fn record_line_start(&mut self, offset: usize) {
        if self.line_starts.last().is_some_and(|&last| offset > last) {
            self.line_starts.push(offset);
        }
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(offset).copied()
    }

    fn starts_with_at(&self, offset: usize, prefix: &str) -> bool {
        self.source
            .as_bytes()
            .get(offset..)
            .is_some_and(|rest| rest.starts_with(prefix.as_bytes()))
    }

    /// End of the `[A-Za-z_][A-Za-z0-9_]*` word starting at `from`, or `from`
    fn word_end(&self, from: usize) -> usize {
        if !self.byte_at(from).is_some_and(is_word_start) {
            return from;
        }
        let mut end = from + 1;
        while self.byte_at(end).is_some_and(is_word_byte) {
            end += 1;
        }
        end
    }

    fn skip_blanks(&self, from: usize) -> usize {
        let mut cursor = from;
        while matches!(self.byte_at(cursor), Some(b' ' | b'\t')) {
            cursor += 1;
        }
        cursor
    }

    // === TOKENS ===

    fn push_token(&mut self, token: Token, start: usize, end: usize) -> Result<(), LexerError> {
        if self.tokens.len() >= MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: self.tokens.len() + 1,
                span: self.span(start, end),
            });
        }

        let annotation = self.pending_annotation.take().map(|pending| pending.name);
        let token = token.with_annotation(annotation);
        self.metrics.record_token(&token, &self.preferences);
        let span = self.span(start, end);
        self.tokens.push(Spanned::new(token, span));
        Ok(())
    }

    // === BRANCHES ===

    fn check_line_endings(&self) -> Result<(), LexerError> {
        if let Some(index) = self.source.find('\r') {
            let line_starts: Vec<usize> = std::iter::once(0)
                .chain(self.source[..index].match_indices('\n').map(|(i, _)| i + 1))
                .collect();
            let span = Span::new(
                resolve_position(&self.source, &line_starts, index),
                resolve_position(&self.source, &line_starts, index + 1),
            );
            return Err(LexerError::CarriageReturn { span });
        }
        Ok(())
    }

    fn scan_next(&mut self) -> Result<(), LexerError> {
        let Some(ch) = self.source[self.offset..].chars().next() else {
            return Ok(());
        };

        if ch == '\n' {
            self.offset += 1;
            self.record_line_start(self.offset);
            return Ok(());
        }

        if ch.is_ascii_digit() {
            return self.scan_number();
        }

        if matches!(ch, '\'' | '"' | '`') {
            return self.scan_string(ch as u8);
        }

        if self.at_line_comment() {
            return self.scan_line_comment();
        }

        if self.starts_with_at(self.offset, "/*") {
            return self.scan_block_comment();
        }

        if ch == ':' {
            return self.scan_type_annotation();
        }

        if let Some(m) = langdef::match_operator(&self.source, self.offset) {
            return self.scan_operator(m);
        }

        if let Some(m) = langdef::match_keyword(&self.source, self.offset) {
            if !self.byte_at(m.end).is_some_and(is_word_byte) {
                self.offset = m.end;
                return self.push_token(Token::keyword(m.text), m.start, m.end);
            }
        }

        if ch == '#' {
            return self.scan_pragma();
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return self.scan_identifier();
        }

        if matches!(ch, ' ' | '\t') {
            self.offset += 1;
            return Ok(());
        }

        Err(LexerError::InvalidCharacter {
            character: ch,
            span: self.span(self.offset, self.offset + ch.len_utf8()),
        })
    }

    fn scan_number(&mut self) -> Result<(), LexerError> {
        let start = self.offset;
        let mut end = start;
        while self.byte_at(end).is_some_and(|b| b.is_ascii_digit()) {
            end += 1;
        }
        if self.byte_at(end) == Some(b'.') && self.byte_at(end + 1).is_some_and(|b| b.is_ascii_digit())
        {
            end += 1;
            while self.byte_at(end).is_some_and(|b| b.is_ascii_digit()) {
                end += 1;
            }
        }

        self.offset = end;
        let text = self.source[start..end].to_string();
        self.push_token(Token::number(text), start, end)
    }

    fn scan_string(&mut self, quote: u8) -> Result<(), LexerError> {
        let start = self.offset;
        let triple = [quote; 3];
        let delimiter: &[u8] = if self.source.as_bytes()[start..].starts_with(&triple) {
            &triple
        } else {
            &triple[..1]
        };
        let body_start = start + delimiter.len();

        let close = self.source.as_bytes()[body_start..]
            .windows(delimiter.len())
            .position(|window| window == delimiter);
        let Some(relative) = close else {
            return Err(LexerError::UnterminatedString {
                span: self.span(start, body_start),
            });
        };

        let body_end = body_start + relative;
        let end = body_end + delimiter.len();
        let size = body_end - body_start;
        if size > MAX_STRING_SIZE {
            return Err(LexerError::StringTooLarge {
                size,
                span: self.span(start, body_start),
            });
        }

        let newlines: Vec<usize> = self.source[body_start..body_end]
            .match_indices('\n')
            .map(|(i, _)| body_start + i + 1)
            .collect();
        for line_start in newlines {
            self.record_line_start(line_start);
        }

        let text = self.source[body_start..body_end].to_string();
        self.metrics.record_string_length(size, &self.preferences);
        self.offset = end;
        self.push_token(Token::string(text), start, end)
    }

    fn at_line_comment(&self) -> bool {
        match self.byte_at(self.offset) {
            Some(b'/') => self.byte_at(self.offset + 1) == Some(b'/'),
            Some(b'#') => matches!(self.byte_at(self.offset + 1), Some(b' ' | b'\t')),
            Some(b';') => true,
            _ => false,
        }
    }

    /// Skips to the newline, which the newline branch then records
    fn scan_line_comment(&mut self) -> Result<(), LexerError> {
        let start = self.offset;
        let end = self.source[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.source.len());

        let length = end - start;
        if length > MAX_COMMENT_LENGTH {
            return Err(LexerError::CommentTooLong {
                length,
                span: self.span(start, start + 1),
            });
        }

        self.metrics.record_comment(length, 0);
        self.offset = end;
        Ok(())
    }

    fn scan_block_comment(&mut self) -> Result<(), LexerError> {
        let start = self.offset;
        self.comment_stack.clear();
        self.comment_stack.push(start);
        self.offset += 2;
        let mut max_depth = 1;

        while let Some(&open) = self.comment_stack.last() {
            let rest = &self.source.as_bytes()[self.offset..];
            if rest.is_empty() {
                return Err(LexerError::UnterminatedComment {
                    span: self.span(open, open + 2),
                });
            }

            if rest.starts_with(b"/*") {
                if self.comment_stack.len() >= MAX_COMMENT_NESTING_DEPTH {
                    return Err(LexerError::CommentNestingTooDeep {
                        depth: self.comment_stack.len() + 1,
                        span: self.span(self.offset, self.offset + 2),
                    });
                }
                self.comment_stack.push(self.offset);
                max_depth = max_depth.max(self.comment_stack.len());
                self.offset += 2;
            } else if rest.starts_with(b"*/") {
                self.comment_stack.pop();
                self.offset += 2;
            } else {
                let is_newline = rest[0] == b'\n';
                self.offset += 1;
                if is_newline {
                    self.record_line_start(self.offset);
                }
            }

            if self.offset - start > MAX_COMMENT_LENGTH {
                return Err(LexerError::CommentTooLong {
                    length: self.offset - start,
                    span: self.span(start, start + 2),
                });
            }
        }

        self.metrics.record_comment(self.offset - start, max_depth);
        Ok(())
    }

    /// `:name` is not a token; the name rides on the next token produced
    fn scan_type_annotation(&mut self) -> Result<(), LexerError> {
        let start = self.offset;
        let name_end = self.word_end(start + 1);
        if name_end == start + 1 {
            return Err(LexerError::InvalidCharacter {
                character: ':',
                span: self.span(start, start + 1),
            });
        }

        self.pending_annotation = Some(PendingAnnotation {
            name: self.source[start + 1..name_end].to_string(),
            start,
            end: name_end,
        });
        self.offset = name_end;
        Ok(())
    }

    fn scan_operator(&mut self, m: Match) -> Result<(), LexerError> {
        self.offset = m.end;
        self.push_token(Token::operator(m.text.trim()), m.start, m.end)
    }

    fn scan_pragma(&mut self) -> Result<(), LexerError> {
        let start = self.offset;
        let word_end = self.word_end(start + 1);

        if &self.source[start + 1..word_end] == "lang" {
            let cursor = self.skip_blanks(word_end);
            if self.byte_at(cursor) == Some(b'=') {
                let name_start = self.skip_blanks(cursor + 1);
                let mut name_end = name_start;
                while self
                    .byte_at(name_end)
                    .is_some_and(|b| is_word_byte(b) || b == b'-')
                {
                    name_end += 1;
                }

                if let Some(dialect) = Dialect::from_pragma(&self.source[name_start..name_end]) {
                    self.offset = name_end;
                    self.switch_dialect(dialect, start, name_end);
                    return Ok(());
                }
            }
        }

        let line = self.source[start..].lines().next().unwrap_or("#");
        let end = start + line.trim_end().len();
        Err(LexerError::UnknownPragma {
            pragma: self.source[start..end].to_string(),
            span: self.span(start, end),
        })
    }

    fn switch_dialect(&mut self, dialect: Dialect, start: usize, end: usize) {
        self.dialect_switches.push(DialectSwitch {
            token_index: self.tokens.len(),
            dialect,
        });
        self.dialect = dialect;
        self.metrics.dialect_switches += 1;

        if self.preferences.log_dialect_switches {
            log_success!(codes::success::DIALECT_SWITCHED, "Dialect switched by pragma",
                "dialect" => self.dialect,
                "token_index" => self.tokens.len(),
                "at" => self.span(start, end).start
            );
        }
    }

    fn scan_identifier(&mut self) -> Result<(), LexerError> {
        let start = self.offset;
        let mut segments = vec![(start, self.word_end(start))];

        while let Some(&(_, last_end)) = segments.last() {
            if self.byte_at(last_end) != Some(b'.') {
                break;
            }
            let next_end = self.word_end(last_end + 1);
            if next_end == last_end + 1 {
                break;
            }
            segments.push((last_end + 1, next_end));
        }

        for &(seg_start, seg_end) in &segments {
            let length = seg_end - seg_start;
            if length > MAX_IDENTIFIER_LENGTH {
                return Err(LexerError::IdentifierTooLong {
                    length,
                    span: self.span(seg_start, seg_end),
                });
            }
        }

        let end = segments.last().map(|&(_, e)| e).unwrap_or(start);
        self.offset = end;

        if segments.len() == 1 {
            let word = self.source[start..end].to_string();
            let token = if langdef::is_keyword(&word) {
                Token::keyword(word)
            } else {
                Token::identifier(word)
            };
            return self.push_token(token, start, end);
        }

        self.push_member_access(&segments)
    }

    /// `a.b.c` becomes `( . ( . a b ) c )` with zero-width synthetic tokens
    fn push_member_access(&mut self, segments: &[(usize, usize)]) -> Result<(), LexerError> {
        let start = segments[0].0;
        for _ in 1..segments.len() {
            self.push_token(Token::operator("("), start, start)?;
            self.push_token(Token::operator("."), start, start)?;
        }

        for (index, &(seg_start, seg_end)) in segments.iter().enumerate() {
            let name = self.source[seg_start..seg_end].to_string();
            self.push_token(Token::identifier(name), seg_start, seg_end)?;
            if index > 0 {
                self.push_token(Token::operator(")"), seg_end, seg_end)?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<(TokenStream, LexicalMetrics), LexerError> {
        let end = self.source.len();

        if let Some(pending) = self.pending_annotation.take() {
            let (ann_start, ann_end) = (pending.start, pending.end);
            let token = Token::new(TokenClass::TypeAnnotation, pending.name);
            self.push_token(token, ann_start, ann_end)?;
        }

        let eof_span = self.span(end, end);
        self.tokens.push(Spanned::new(Token::eof(), eof_span));
        self.metrics.line_count = self.line_starts.len();

        let source_map = SourceMap::from_line_starts(self.source, self.line_starts);
        let stream = TokenStream::with_source_map(self.tokens, source_map)
            .with_dialect_switches(self.dialect_switches);
        Ok((stream, self.metrics))
    }
}

/// Lexical analyzer holding preferences and the metrics of the last scan
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Tokenize a source buffer into a total token stream
    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "source_bytes" => source.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT,
            "max_string_size_allowed" => MAX_STRING_SIZE
        );

        let state = LexerState::new(source, self.preferences.clone());
        match state.run() {
            Ok((stream, metrics)) => {
                self.metrics = metrics;
                log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
                    "tokens" => stream.len(),
                    "lines" => self.metrics.line_count,
                    "dialect_switches" => self.metrics.dialect_switches
                );
                if self.preferences.collect_detailed_metrics {
                    log_debug!("Lexical metrics",
                        "keywords" => self.metrics.keyword_tokens,
                        "identifiers" => self.metrics.identifier_tokens,
                        "operators" => self.metrics.operator_tokens,
                        "strings" => self.metrics.string_tokens,
                        "numbers" => self.metrics.number_tokens,
                        "comments" => self.metrics.comment_count,
                        "max_comment_depth" => self.metrics.max_comment_depth
                    );
                }
                Ok(stream)
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    span = error.span(),
                    "line" => error.span().start.line,
                    "column" => error.span().start.column
                );
                Err(error)
            }
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
