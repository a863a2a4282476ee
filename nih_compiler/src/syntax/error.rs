//! Syntax errors
//!
//! Every variant carries the span it is reported at, so the pipeline can
//! always render a caret diagnostic.

use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String, span: Span },

    #[error("Missing ')' to close '({head}' opened at {opened}, reached end of input")]
    MissingCloseParen {
        head: String,
        opened: crate::utils::Position,
        span: Span,
    },

    #[error("Unknown head symbol '{head}'")]
    UnknownHeadSymbol { head: String, span: Span },

    #[error("Empty list '()' is not a valid form")]
    EmptyList { span: Span },

    #[error("Unsupported syntax in the default dialect: found {found}")]
    UnsupportedDialect { found: String, span: Span },

    #[error("Too many children in one list: {count} (max {max})")]
    TooManyChildren { count: usize, max: usize, span: Span },

    #[error("Invalid number literal '{text}'")]
    InvalidNumber { text: String, span: Span },

    #[error("Maximum nesting depth {depth} exceeded")]
    MaxRecursionDepth { depth: usize, span: Span },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unexpected_end_of_input(expected: &str, span: Span) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
            span,
        }
    }

    pub fn unknown_head(head: &str, span: Span) -> Self {
        Self::UnknownHeadSymbol {
            head: head.to_string(),
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::MissingCloseParen { .. } => codes::syntax::MISSING_CLOSE_PAREN,
            Self::UnknownHeadSymbol { .. } => codes::syntax::UNKNOWN_HEAD_SYMBOL,
            Self::EmptyList { .. } => codes::syntax::EMPTY_LIST,
            Self::UnsupportedDialect { .. } => codes::syntax::UNSUPPORTED_DIALECT,
            Self::TooManyChildren { .. } => codes::syntax::TOO_MANY_CHILDREN,
            Self::InvalidNumber { .. } => codes::syntax::INVALID_NUMBER,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::MissingCloseParen { span, .. }
            | Self::UnknownHeadSymbol { span, .. }
            | Self::EmptyList { span }
            | Self::UnsupportedDialect { span, .. }
            | Self::TooManyChildren { span, .. }
            | Self::InvalidNumber { span, .. }
            | Self::MaxRecursionDepth { span, .. } => *span,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }

    /// Extra hint rendered under the diagnostic
    pub fn help(&self) -> Option<String> {
        match self {
            Self::UnsupportedDialect { .. } => Some(
                "only parenthesized forms parse in the default dialect; \
                 start the file with '#lang = nih-sexpr'"
                    .to_string(),
            ),
            Self::UnknownHeadSymbol { .. } => Some(format!(
                "known heads: {}",
                super::recipes::known_heads().join(" ")
            )),
            Self::MissingCloseParen { .. } | Self::UnexpectedEndOfInput { .. } => {
                Some("check for unbalanced parentheses".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    fn span() -> Span {
        Span::new(Position::new(10, 1, 11), Position::new(15, 1, 16))
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            SyntaxError::unexpected_token("identifier", "number '1'", span()).error_code(),
            codes::syntax::UNEXPECTED_TOKEN
        );
        assert_eq!(
            SyntaxError::unexpected_end_of_input("expression", span()).error_code(),
            codes::syntax::UNEXPECTED_END_OF_INPUT
        );
        assert_eq!(
            SyntaxError::unknown_head("frob", span()).error_code().as_str(),
            "E043"
        );
        assert_eq!(
            SyntaxError::EmptyList { span: span() }.error_code().as_str(),
            "E044"
        );
    }

    #[test]
    fn test_span_extraction() {
        let error = SyntaxError::unknown_head("frob", span());
        assert_eq!(error.span(), span());
        assert_eq!(error.span().start.column, 11);
    }

    #[test]
    fn test_messages() {
        let error = SyntaxError::MissingCloseParen {
            head: "do".to_string(),
            opened: Position::new(0, 1, 1),
            span: span(),
        };
        assert_eq!(
            error.to_string(),
            "Missing ')' to close '(do' opened at 1:1, reached end of input"
        );
        assert!(SyntaxError::unexpected_end_of_input("expression", span())
            .to_string()
            .contains("end of input"));
    }

    #[test]
    fn test_help_hints() {
        let dialect = SyntaxError::UnsupportedDialect {
            found: "identifier 'x'".to_string(),
            span: span(),
        };
        assert!(dialect.help().is_some_and(|h| h.contains("#lang = nih-sexpr")));

        let unknown = SyntaxError::unknown_head("frob", span());
        assert!(unknown.help().is_some_and(|h| h.contains("let")));
        assert_eq!(SyntaxError::EmptyList { span: span() }.help(), None);
    }

    #[test]
    fn test_registry_properties() {
        let error = SyntaxError::MaxRecursionDepth {
            depth: 256,
            span: span(),
        };
        assert_eq!(error.category(), "Syntax");
        assert!(!error.recommended_action().is_empty());
    }
}
