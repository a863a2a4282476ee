//! Shared primitives used by the lexer, parser, emitter, and diagnostics

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
