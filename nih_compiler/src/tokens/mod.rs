//! Tokens and the token stream
//!
//! The lexer produces a flat `Vec<Spanned<Token>>` which is wrapped in a
//! `TokenStream` for the parser. Each token keeps its class, its text, and
//! the type annotation (`:name`) that preceded it, if any.

pub mod token;
pub mod token_stream;

pub use token::{Dialect, DialectSwitch, Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream, TokenStreamError};

pub use crate::utils::{Position, SourceMap, Span, Spanned};
