//! Lexical analysis
//!
//! Turns NIH source text into a total `TokenStream`. Scanning is driven by
//! the ordered tables in `grammar::langdef` and bounded by the compile-time
//! limits in `config::compile_time::lexical`.

pub mod analyzer;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::tokens::{TokenClass, TokenStream};

pub use analyzer::{LexerError, LexerState, LexicalAnalyzer, LexicalMetrics};

/// Tokenize with default preferences
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize(source)
}

/// Tokenize with custom runtime preferences (limits stay compile-time)
pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}

/// Check that every lexical error code is registered with metadata
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    use crate::logging::codes;

    let lexical_codes = [
        codes::lexical::INVALID_CHARACTER,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::UNTERMINATED_COMMENT,
        codes::lexical::IDENTIFIER_TOO_LONG,
        codes::lexical::STRING_TOO_LARGE,
        codes::lexical::CARRIAGE_RETURN,
        codes::lexical::COMMENT_TOO_LONG,
        codes::lexical::TOO_MANY_TOKENS,
        codes::lexical::COMMENT_NESTING_TOO_DEEP,
        codes::lexical::UNKNOWN_PRAGMA,
        codes::lexical::NO_PROGRESS,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "max_string_size" => MAX_STRING_SIZE,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_comment_length" => MAX_COMMENT_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_comment_nesting_depth" => MAX_COMMENT_NESTING_DEPTH
    );

    Ok(())
}

pub fn get_security_limits() -> SecurityLimits {
    SecurityLimits {
        max_string_size: MAX_STRING_SIZE,
        max_identifier_length: MAX_IDENTIFIER_LENGTH,
        max_comment_length: MAX_COMMENT_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
        max_comment_nesting_depth: MAX_COMMENT_NESTING_DEPTH,
    }
}

/// Compile-time lexical limits, for reporting
#[derive(Debug, Clone)]
pub struct SecurityLimits {
    pub max_string_size: usize,
    pub max_identifier_length: usize,
    pub max_comment_length: usize,
    pub max_token_count: usize,
    pub max_comment_nesting_depth: usize,
}

impl SecurityLimits {
    /// Conservative bounds for untrusted input
    pub fn is_conservative(&self) -> bool {
        self.max_string_size <= 10_000_000
            && self.max_identifier_length <= 1000
            && self.max_comment_length <= 1_000_000
            && self.max_token_count <= 5_000_000
            && self.max_comment_nesting_depth <= 1000
    }
}

/// Token distribution of a stream
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenCounts {
    pub total: usize,
    pub keywords: usize,
    pub identifiers: usize,
    pub operators: usize,
    pub strings: usize,
    pub numbers: usize,
    pub annotations: usize,
    pub parens: usize,
}

impl TokenCounts {
    /// Open and close parens pair up
    pub fn parens_balanced(&self, stream: &TokenStream) -> bool {
        let mut depth: i64 = 0;
        for token in stream.tokens() {
            if token.value.is_open_paren() {
                depth += 1;
            } else if token.value.is_close_paren() {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
        }
        depth == 0
    }
}

/// Count tokens per class, EOF excluded
pub fn get_token_counts(stream: &TokenStream) -> TokenCounts {
    let mut counts = TokenCounts::default();

    for token in stream.tokens() {
        let token = &token.value;
        if token.is_eof() {
            continue;
        }
        counts.total += 1;
        if token.type_annotation.is_some() {
            counts.annotations += 1;
        }
        match token.class {
            TokenClass::Keyword => counts.keywords += 1,
            TokenClass::Identifier => counts.identifiers += 1,
            TokenClass::StringLiteral => counts.strings += 1,
            TokenClass::NumberLiteral => counts.numbers += 1,
            TokenClass::TypeAnnotation => counts.annotations += 1,
            TokenClass::Operator => {
                counts.operators += 1;
                if token.is_open_paren() || token.is_close_paren() {
                    counts.parens += 1;
                }
            }
            TokenClass::Eof => {}
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    #[test]
    fn test_analyzer_keeps_preferences() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            track_operator_patterns: true,
            ..Default::default()
        };
        let analyzer = LexicalAnalyzer::with_preferences(preferences);
        assert!(!analyzer.preferences().collect_detailed_metrics);
        assert!(analyzer.preferences().track_operator_patterns);
    }

    #[test]
    fn test_init_logging() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_security_limits() {
        let limits = get_security_limits();
        assert!(limits.max_string_size > 0);
        assert!(limits.max_identifier_length > 0);
        assert!(limits.max_token_count > 0);
        assert!(limits.is_conservative());
    }

    #[test]
    fn test_token_counts() {
        let stream = tokenize("(call print :string 'hi' 2)").unwrap();
        let counts = get_token_counts(&stream);
        assert_eq!(counts.total, 6);
        assert_eq!(counts.keywords, 1);
        assert_eq!(counts.identifiers, 1);
        assert_eq!(counts.strings, 1);
        assert_eq!(counts.numbers, 1);
        assert_eq!(counts.parens, 2);
        assert_eq!(counts.annotations, 1);
        assert!(counts.parens_balanced(&stream));

        let open = tokenize("((x)").unwrap();
        assert!(!get_token_counts(&open).parens_balanced(&open));
    }

    #[test]
    fn test_operator_patterns_follow_preferences() {
        let preferences = LexicalPreferences {
            track_operator_patterns: true,
            log_string_statistics: true,
            ..Default::default()
        };

        let mut metrics = LexicalMetrics::default();
        metrics.record_token(&Token::operator("+"), &preferences);
        metrics.record_token(&Token::operator("+"), &preferences);
        metrics.record_string_length(100, &preferences);

        assert_eq!(metrics.operator_tokens, 2);
        assert_eq!(metrics.max_string_length, 100);
        assert_eq!(metrics.operator_usage_patterns.get("+"), Some(&2));
    }

    #[test]
    fn test_tokenize_with_preferences() {
        let preferences = LexicalPreferences {
            log_dialect_switches: true,
            ..Default::default()
        };
        let stream = tokenize_with_preferences("#lang = nih-sexpr\n(x)", preferences).unwrap();
        assert_eq!(stream.dialect_switches().len(), 1);
    }
}
