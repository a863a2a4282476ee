//! Language definition tables and the AST they feed

pub mod ast;
pub mod langdef;

pub use ast::{Arity, BinaryOp, Node, NodeKind, Tag, UnaryOp};
pub use langdef::{classify_word, Category, WordClass};
