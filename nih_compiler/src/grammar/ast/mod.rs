//! Abstract syntax tree

pub mod nodes;

pub use nodes::{Arity, BinaryOp, Node, NodeKind, Tag, UnaryOp};
