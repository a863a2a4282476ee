//! Syntax analysis module - TokenStream to AST transformation
//!
//! Parenthesized forms are dispatched on their head symbol through the
//! table in `recipes`; every node carries the span of its source text.

mod error;
mod parser;
pub mod recipes;

pub use crate::grammar::ast::Node;
pub use error::{SyntaxError, SyntaxResult};
pub use parser::{parse_token_stream, NihParser};

use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_info};

/// Parse a token stream into a `module` node
pub fn parse_module(token_stream: TokenStream) -> SyntaxResult<Node> {
    log_debug!("Starting syntax analysis",
        "tokens" => token_stream.len(),
        "dialect_switches" => token_stream.dialect_switches().len()
    );

    parse_token_stream(token_stream)
}

/// Check that every syntax error code is registered with metadata
pub fn init_syntax_logging() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::UNEXPECTED_END_OF_INPUT,
        codes::syntax::MISSING_CLOSE_PAREN,
        codes::syntax::UNKNOWN_HEAD_SYMBOL,
        codes::syntax::EMPTY_LIST,
        codes::syntax::UNSUPPORTED_DIALECT,
        codes::syntax::TOO_MANY_CHILDREN,
        codes::syntax::INVALID_NUMBER,
        codes::syntax::MAX_RECURSION_DEPTH,
    ];

    for code in &syntax_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_info!("Syntax module logging validation completed",
        "heads" => recipes::HEAD_RECIPES.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::Tag;
    use crate::tokens::{Token, TokenStream};

    #[test]
    fn test_module_initialization() {
        assert!(init_syntax_logging().is_ok());
    }

    #[test]
    fn test_empty_stream_is_empty_module() {
        let module = parse_module(TokenStream::new(Vec::new())).unwrap();
        assert_eq!(module.tag(), Tag::Module);
        assert!(module.children().is_empty());
    }

    #[test]
    fn test_error_code_consistency() {
        let tokens = crate::lexical::tokenize("(let x").unwrap();
        let error = parse_module(tokens).unwrap_err();

        let code = error.error_code();
        assert_ne!(codes::get_description(code.as_str()), "Unknown error");
        assert_eq!(codes::get_category(code.as_str()), "Syntax");
        assert!(error.requires_halt());
    }

    #[test]
    fn test_hand_built_stream() {
        use crate::utils::Spanned;
        use crate::utils::Span;

        let tokens = vec![
            Spanned::new(Token::operator("("), Span::dummy()),
            Spanned::new(Token::keyword("call"), Span::dummy()),
            Spanned::new(Token::identifier("f"), Span::dummy()),
            Spanned::new(Token::operator(")"), Span::dummy()),
        ];
        let module = parse_module(TokenStream::new(tokens)).unwrap();
        assert_eq!(module.children()[0].tag(), Tag::Call);
    }
}
