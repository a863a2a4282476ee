//! Token stream handed from the lexer to the parser
//!
//! The stream is total: it always ends in an end-of-stream token, and every
//! lookahead past the end yields that same token. It also carries the line
//! table and the dialect switches the lexer recorded.

use crate::{
    tokens::token::*,
    utils::{SourceMap, Span, Spanned},
};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

#[derive(Debug, Clone)]
pub struct TokenStream {
    /// Scanned tokens, always terminated by exactly one EOF token
    tokens: Vec<SpannedToken>,
    position: usize,
    source_map: Option<SourceMap>,
    dialect_switches: Vec<DialectSwitch>,
}

impl TokenStream {
    /// Create a stream, appending an EOF token if the input lacks one
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !tokens.last().is_some_and(|t| t.value.is_eof()) {
            let end = tokens
                .last()
                .map(|t| Span::point(t.span.end))
                .unwrap_or_else(Span::dummy);
            tokens.push(Spanned::new(Token::eof(), end));
        }

        crate::log_debug!("Token stream created",
            "tokens" => tokens.len()
        );

        Self {
            tokens,
            position: 0,
            source_map: None,
            dialect_switches: Vec::new(),
        }
    }

    /// Create stream with source map for error rendering
    pub fn with_source_map(tokens: Vec<SpannedToken>, source_map: SourceMap) -> Self {
        let mut stream = Self::new(tokens);
        stream.source_map = Some(source_map);
        stream
    }

    pub fn with_dialect_switches(mut self, switches: Vec<DialectSwitch>) -> Self {
        self.dialect_switches = switches;
        self
    }

    // === NAVIGATION ===

    /// Current token; the EOF token once the stream is exhausted
    pub fn current(&self) -> &SpannedToken {
        self.peek_ahead(0)
    }

    pub fn current_token(&self) -> &Token {
        &self.current().value
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    pub fn peek(&self) -> &SpannedToken {
        self.peek_ahead(1)
    }

    pub fn peek_ahead(&self, n: usize) -> &SpannedToken {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    /// Consume the current token and return it. EOF is never consumed.
    pub fn advance(&mut self) -> SpannedToken {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token().is_eof()
    }

    /// Number of tokens, EOF included
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the stream holds only the EOF token
    pub fn is_empty(&self) -> bool {
        self.tokens.len() == 1
    }

    pub fn position(&self) -> usize {
        self.position
    }

    // === PARSER INTEGRATION ===

    /// Consume an operator or keyword spelled `expected`
    pub fn expect_symbol(&mut self, expected: &str) -> Result<SpannedToken, TokenStreamError> {
        let current = self.current();
        if current.value.is_symbol(expected) {
            Ok(self.advance())
        } else if current.value.is_eof() {
            Err(TokenStreamError::UnexpectedEndOfStream {
                expected: expected.to_string(),
                span: current.span,
            })
        } else {
            Err(TokenStreamError::UnexpectedToken {
                expected: expected.to_string(),
                found: current.value.describe(),
                span: current.span,
            })
        }
    }

    // === DIALECTS ===

    pub fn dialect_switches(&self) -> &[DialectSwitch] {
        &self.dialect_switches
    }

    /// Dialect in force for the token at `index`
    pub fn dialect_at(&self, index: usize) -> Dialect {
        self.dialect_switches
            .iter()
            .take_while(|switch| switch.token_index <= index)
            .last()
            .map(|switch| switch.dialect)
            .unwrap_or_default()
    }

    pub fn current_dialect(&self) -> Dialect {
        self.dialect_at(self.position)
    }

    // === ACCESS ===

    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }

    pub fn source_map(&self) -> Option<&SourceMap> {
        self.source_map.as_ref()
    }

    /// Format an error with source context when a source map is attached
    pub fn format_error(&self, filename: &str, span: Span, message: &str) -> String {
        match &self.source_map {
            Some(source_map) => source_map.format_error(filename, &span, message),
            None => format!("error: {} at {}:{}", message, filename, span.start),
        }
    }

}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenStreamError {
    #[error("Expected '{expected}', found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Expected '{expected}', but reached end of input")]
    UnexpectedEndOfStream { expected: String, span: Span },
}

impl TokenStreamError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } | Self::UnexpectedEndOfStream { span, .. } => *span,
        }
    }
}
