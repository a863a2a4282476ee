//! AST node definitions
//!
//! Every construct is a `Node` carrying its span and an optional type
//! annotation. The payload lives in `NodeKind`, one variant per tag, so each
//! tag has a fixed shape. `children()` flattens a node back into the ordered
//! child list that `Tag::arity()` constrains.

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// === OPERATORS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    BitOr,
    BitAnd,
    BitXor,
    And,
    Or,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl BinaryOp {
    /// Parse from the head symbol spelling used in source
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "^" => Some(Self::Pow),
            "|" => Some(Self::BitOr),
            "&" => Some(Self::BitAnd),
            "^^" => Some(Self::BitXor),
            "&&" => Some(Self::And),
            "||" => Some(Self::Or),
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            _ => None,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::Add => Tag::Add,
            Self::Sub => Tag::Sub,
            Self::Mul => Tag::Mul,
            Self::Div => Tag::Div,
            Self::Pow => Tag::Pow,
            Self::BitOr => Tag::BitOr,
            Self::BitAnd => Tag::BitAnd,
            Self::BitXor => Tag::BitXor,
            Self::And => Tag::And,
            Self::Or => Tag::Or,
            Self::Eq => Tag::Eq,
            Self::Ne => Tag::Ne,
            Self::Gt => Tag::Gt,
            Self::Ge => Tag::Ge,
            Self::Lt => Tag::Lt,
            Self::Le => Tag::Le,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    Not,
}

impl UnaryOp {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            "~" => Some(Self::BitNot),
            "!" => Some(Self::Not),
            _ => None,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::Plus => Tag::UnaryPlus,
            Self::Minus => Tag::UnaryMinus,
            Self::BitNot => Tag::BitNot,
            Self::Not => Tag::Not,
        }
    }
}

// === TAGS ===

/// Node tags, spelled the way AST dumps print them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    StrLit,
    NumLit,
    Ident,
    Type,
    Module,
    Doc,
    Let,
    Set,
    Inc,
    DoWhile,
    UnaryPlus,
    UnaryMinus,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    BitOr,
    BitAnd,
    BitXor,
    BitNot,
    And,
    Or,
    Not,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Fn,
    PList,
    Param,
    Return,
    ForLt,
    Cast,
    Call,
    Do,
    If,
    Ternary,
    Member,
}

/// Allowed child counts for a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn allows(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Range(lo, hi) => (lo..=hi).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Range(lo, hi) => write!(f, "{} to {}", lo, hi),
        }
    }
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrLit => "strlit",
            Self::NumLit => "numlit",
            Self::Ident => "ident",
            Self::Type => "type",
            Self::Module => "module",
            Self::Doc => "doc",
            Self::Let => "let",
            Self::Set => "set!",
            Self::Inc => "inc!",
            Self::DoWhile => "do-while",
            Self::UnaryPlus => "unary +",
            Self::UnaryMinus => "unary -",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::BitOr => "bit-or",
            Self::BitAnd => "bit-and",
            Self::BitXor => "bit-xor",
            Self::BitNot => "bit-not",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Fn => "fn",
            Self::PList => "plist",
            Self::Param => "param",
            Self::Return => "return",
            Self::ForLt => "forlt",
            Self::Cast => "cast",
            Self::Call => "call",
            Self::Do => "do",
            Self::If => "if",
            Self::Ternary => "?",
            Self::Member => ".",
        }
    }

    /// Child counts a well-formed node of this tag may have
    pub fn arity(&self) -> Arity {
        match self {
            Self::StrLit | Self::NumLit | Self::Ident | Self::Type => Arity::Exact(0),
            Self::Module | Self::Do | Self::PList => Arity::AtLeast(0),
            Self::Doc | Self::Inc | Self::Param | Self::Return => Arity::Exact(1),
            Self::UnaryPlus | Self::UnaryMinus | Self::BitNot | Self::Not => Arity::Exact(1),
            Self::Let | Self::Set | Self::DoWhile | Self::Cast | Self::Member => Arity::Exact(2),
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Pow
            | Self::BitOr
            | Self::BitAnd
            | Self::BitXor
            | Self::And
            | Self::Or
            | Self::Eq
            | Self::Ne
            | Self::Gt
            | Self::Ge
            | Self::Lt
            | Self::Le => Arity::Exact(2),
            Self::Fn | Self::Call => Arity::AtLeast(1),
            Self::ForLt => Arity::AtLeast(3),
            Self::If => Arity::Range(2, 3),
            Self::Ternary => Arity::Exact(3),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// === NODES ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_annotation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum NodeKind {
    StrLit {
        value: String,
    },
    NumLit {
        value: f64,
        /// Exact source spelling, sign included
        text: String,
    },
    Ident {
        name: String,
    },
    Type {
        name: String,
    },
    Module {
        forms: Vec<Node>,
    },
    Doc {
        text: Box<Node>,
    },
    Let {
        name: Box<Node>,
        value: Box<Node>,
    },
    Set {
        name: Box<Node>,
        value: Box<Node>,
    },
    Inc {
        name: Box<Node>,
    },
    DoWhile {
        /// Always a `do` node
        body: Box<Node>,
        cond: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Fn {
        /// Always a `plist` node
        params: Box<Node>,
        body: Vec<Node>,
    },
    PList {
        params: Vec<Node>,
    },
    Param {
        name: Box<Node>,
    },
    Return {
        value: Box<Node>,
    },
    ForLt {
        var: Box<Node>,
        start: Box<Node>,
        end: Box<Node>,
        body: Vec<Node>,
    },
    Cast {
        value: Box<Node>,
        /// Always a `type` node
        target: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Do {
        stmts: Vec<Node>,
    },
    If {
        cond: Box<Node>,
        then: Box<Node>,
        otherwise: Option<Box<Node>>,
    },
    Ternary {
        cond: Box<Node>,
        then: Box<Node>,
        otherwise: Box<Node>,
    },
    Member {
        object: Box<Node>,
        property: Box<Node>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            type_annotation: None,
        }
    }

    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.type_annotation = annotation;
        self
    }

    pub fn str_lit(value: impl Into<String>, span: Span) -> Self {
        Self::new(
            NodeKind::StrLit {
                value: value.into(),
            },
            span,
        )
    }

    pub fn num_lit(value: f64, text: impl Into<String>, span: Span) -> Self {
        Self::new(
            NodeKind::NumLit {
                value,
                text: text.into(),
            },
            span,
        )
    }

    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Self::new(NodeKind::Ident { name: name.into() }, span)
    }

    pub fn type_name(name: impl Into<String>, span: Span) -> Self {
        Self::new(NodeKind::Type { name: name.into() }, span)
    }

    pub fn tag(&self) -> Tag {
        match &self.kind {
            NodeKind::StrLit { .. } => Tag::StrLit,
            NodeKind::NumLit { .. } => Tag::NumLit,
            NodeKind::Ident { .. } => Tag::Ident,
            NodeKind::Type { .. } => Tag::Type,
            NodeKind::Module { .. } => Tag::Module,
            NodeKind::Doc { .. } => Tag::Doc,
            NodeKind::Let { .. } => Tag::Let,
            NodeKind::Set { .. } => Tag::Set,
            NodeKind::Inc { .. } => Tag::Inc,
            NodeKind::DoWhile { .. } => Tag::DoWhile,
            NodeKind::Unary { op, .. } => op.tag(),
            NodeKind::Binary { op, .. } => op.tag(),
            NodeKind::Fn { .. } => Tag::Fn,
            NodeKind::PList { .. } => Tag::PList,
            NodeKind::Param { .. } => Tag::Param,
            NodeKind::Return { .. } => Tag::Return,
            NodeKind::ForLt { .. } => Tag::ForLt,
            NodeKind::Cast { .. } => Tag::Cast,
            NodeKind::Call { .. } => Tag::Call,
            NodeKind::Do { .. } => Tag::Do,
            NodeKind::If { .. } => Tag::If,
            NodeKind::Ternary { .. } => Tag::Ternary,
            NodeKind::Member { .. } => Tag::Member,
        }
    }

    /// Ordered child list, as the generic arity walk sees it
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::StrLit { .. }
            | NodeKind::NumLit { .. }
            | NodeKind::Ident { .. }
            | NodeKind::Type { .. } => Vec::new(),
            NodeKind::Module { forms: nodes }
            | NodeKind::PList { params: nodes }
            | NodeKind::Do { stmts: nodes } => nodes.iter().collect(),
            NodeKind::Doc { text: child }
            | NodeKind::Inc { name: child }
            | NodeKind::Param { name: child }
            | NodeKind::Return { value: child }
            | NodeKind::Unary { operand: child, .. } => vec![child.as_ref()],
            NodeKind::Let { name, value } | NodeKind::Set { name, value } => {
                vec![name.as_ref(), value.as_ref()]
            }
            NodeKind::DoWhile { body, cond } => vec![body.as_ref(), cond.as_ref()],
            NodeKind::Binary { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            NodeKind::Fn { params, body } => std::iter::once(params.as_ref())
                .chain(body.iter())
                .collect(),
            NodeKind::ForLt {
                var,
                start,
                end,
                body,
            } => [var.as_ref(), start.as_ref(), end.as_ref()]
                .into_iter()
                .chain(body.iter())
                .collect(),
            NodeKind::Cast { value, target } => vec![value.as_ref(), target.as_ref()],
            NodeKind::Call { callee, args } => std::iter::once(callee.as_ref())
                .chain(args.iter())
                .collect(),
            NodeKind::If {
                cond,
                then,
                otherwise,
            } => {
                let mut children = vec![cond.as_ref(), then.as_ref()];
                if let Some(otherwise) = otherwise {
                    children.push(otherwise.as_ref());
                }
                children
            }
            NodeKind::Ternary {
                cond,
                then,
                otherwise,
            } => vec![cond.as_ref(), then.as_ref(), otherwise.as_ref()],
            NodeKind::Member { object, property } => vec![object.as_ref(), property.as_ref()],
        }
    }

    /// Identifier name, if this is an `ident` node
    pub fn ident_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_ident(&self, id: &str) -> bool {
        self.ident_name() == Some(id)
    }

    /// Pre-order walk over this node and all descendants
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

/// Compact S-expression rendering: `(let (ident W) (numlit 16))`
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::StrLit { value } => write!(f, "(strlit {:?})", value)?,
            NodeKind::NumLit { text, .. } => write!(f, "(numlit {})", text)?,
            NodeKind::Ident { name } => write!(f, "(ident {})", name)?,
            NodeKind::Type { name } => write!(f, "(type {})", name)?,
            _ => {
                write!(f, "({}", self.tag())?;
                for child in self.children() {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")?;
            }
        }
        if let Some(annotation) = &self.type_annotation {
            write!(f, ":{}", annotation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::dummy()
    }

    #[test]
    fn test_operator_tags() {
        assert_eq!(BinaryOp::parse("^^").map(|op| op.tag().as_str()), Some("bit-xor"));
        assert_eq!(BinaryOp::parse("&&").map(|op| op.tag().as_str()), Some("and"));
        assert_eq!(BinaryOp::parse("<=").map(|op| op.tag().as_str()), Some("<="));
        assert_eq!(UnaryOp::parse("-").map(|op| op.tag().as_str()), Some("unary -"));
        assert_eq!(UnaryOp::parse("~").map(|op| op.tag().as_str()), Some("bit-not"));
        assert_eq!(BinaryOp::parse("%"), None);
    }

    #[test]
    fn test_arity_rules() {
        assert!(Tag::If.arity().allows(2));
        assert!(Tag::If.arity().allows(3));
        assert!(!Tag::If.arity().allows(4));
        assert!(Tag::ForLt.arity().allows(5));
        assert!(!Tag::ForLt.arity().allows(2));
        assert!(Tag::Module.arity().allows(0));
        assert_eq!(Tag::Add.arity(), Arity::Exact(2));
    }

    #[test]
    fn test_children_follow_shape() {
        let call = Node::new(
            NodeKind::Call {
                callee: Box::new(Node::ident("print", span())),
                args: vec![
                    Node::str_lit("a", span()),
                    Node::num_lit(1.0, "1", span()),
                ],
            },
            span(),
        );
        assert_eq!(call.tag(), Tag::Call);
        let children = call.children();
        assert_eq!(children.len(), 3);
        assert!(children[0].is_ident("print"));
        assert!(call.tag().arity().allows(children.len()));
        assert_eq!(call.node_count(), 4);
    }

    #[test]
    fn test_display_is_sexpr() {
        let node = Node::new(
            NodeKind::Let {
                name: Box::new(Node::ident("W", span())),
                value: Box::new(Node::num_lit(16.0, "16", span())),
            },
            span(),
        );
        assert_eq!(node.to_string(), "(let (ident W) (numlit 16))");

        let annotated = Node::ident("x", span()).with_annotation(Some("float".into()));
        assert_eq!(annotated.to_string(), "(ident x):float");
    }

    #[test]
    fn test_serializes_with_tag_field() {
        let node = Node::new(
            NodeKind::Return {
                value: Box::new(Node::ident("n", span())),
            },
            span(),
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"]["tag"], "return");
        assert_eq!(json["kind"]["value"]["kind"]["name"], "n");
        assert!(json.get("type_annotation").is_none());
    }
}
