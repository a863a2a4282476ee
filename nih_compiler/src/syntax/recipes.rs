//! Head symbol table
//!
//! Maps the first symbol of a parenthesized form to the shape of its
//! children. The parser looks the head up here and then parses children
//! slot by slot.

use crate::grammar::ast::{BinaryOp, Tag, UnaryOp};

/// Child layout of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    /// strlit
    Doc,
    /// ident expr
    Let,
    /// ident expr
    Set,
    /// ident
    Inc,
    /// expr
    Return,
    /// expr type
    Cast,
    /// ident
    Param,
    /// expr expr expr
    Ternary,
    /// expr ident
    Member,
    /// block expr
    DoWhile,
    /// expr expr
    Binary(BinaryOp),
    /// expr, or expr expr
    Sign(UnaryOp, BinaryOp),
    /// expr
    Unary(UnaryOp),
    /// expr expr [expr]
    If,
    /// callee expr*
    Call,
    /// stmt*
    Do,
    /// plist stmt*
    Fn,
    /// param*
    PList,
    /// ident expr expr stmt*
    ForLt,
}

impl Recipe {
    /// Tag of the node this recipe builds; `Sign` reports its binary form
    pub fn tag(&self) -> Tag {
        match self {
            Recipe::Doc => Tag::Doc,
            Recipe::Let => Tag::Let,
            Recipe::Set => Tag::Set,
            Recipe::Inc => Tag::Inc,
            Recipe::Return => Tag::Return,
            Recipe::Cast => Tag::Cast,
            Recipe::Param => Tag::Param,
            Recipe::Ternary => Tag::Ternary,
            Recipe::Member => Tag::Member,
            Recipe::DoWhile => Tag::DoWhile,
            Recipe::Binary(op) | Recipe::Sign(_, op) => op.tag(),
            Recipe::Unary(op) => op.tag(),
            Recipe::If => Tag::If,
            Recipe::Call => Tag::Call,
            Recipe::Do => Tag::Do,
            Recipe::Fn => Tag::Fn,
            Recipe::PList => Tag::PList,
            Recipe::ForLt => Tag::ForLt,
        }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(
            self,
            Recipe::Call | Recipe::Do | Recipe::Fn | Recipe::PList | Recipe::ForLt
        )
    }
}

pub const HEAD_RECIPES: &[(&str, Recipe)] = &[
    ("doc", Recipe::Doc),
    ("let", Recipe::Let),
    ("set!", Recipe::Set),
    ("inc!", Recipe::Inc),
    ("return", Recipe::Return),
    ("cast", Recipe::Cast),
    ("param", Recipe::Param),
    ("?", Recipe::Ternary),
    (".", Recipe::Member),
    ("do-while", Recipe::DoWhile),
    ("+", Recipe::Sign(UnaryOp::Plus, BinaryOp::Add)),
    ("-", Recipe::Sign(UnaryOp::Minus, BinaryOp::Sub)),
    ("*", Recipe::Binary(BinaryOp::Mul)),
    ("/", Recipe::Binary(BinaryOp::Div)),
    ("^", Recipe::Binary(BinaryOp::Pow)),
    ("==", Recipe::Binary(BinaryOp::Eq)),
    ("!=", Recipe::Binary(BinaryOp::Ne)),
    ("<", Recipe::Binary(BinaryOp::Lt)),
    ("<=", Recipe::Binary(BinaryOp::Le)),
    (">", Recipe::Binary(BinaryOp::Gt)),
    (">=", Recipe::Binary(BinaryOp::Ge)),
    ("|", Recipe::Binary(BinaryOp::BitOr)),
    ("&", Recipe::Binary(BinaryOp::BitAnd)),
    ("^^", Recipe::Binary(BinaryOp::BitXor)),
    ("&&", Recipe::Binary(BinaryOp::And)),
    ("||", Recipe::Binary(BinaryOp::Or)),
    ("~", Recipe::Unary(UnaryOp::BitNot)),
    ("!", Recipe::Unary(UnaryOp::Not)),
    ("if", Recipe::If),
    ("call", Recipe::Call),
    ("do", Recipe::Do),
    ("fn", Recipe::Fn),
    ("plist", Recipe::PList),
    ("forlt", Recipe::ForLt),
    ("for-lt", Recipe::ForLt),
];

/// Longest run of adjacent tokens the parser tries to join into one head
pub const MAX_COMPOUND_HEAD_TOKENS: usize = 3;

pub fn lookup(head: &str) -> Option<Recipe> {
    HEAD_RECIPES
        .iter()
        .find(|(name, _)| *name == head)
        .map(|(_, recipe)| *recipe)
}

pub fn is_head(head: &str) -> bool {
    lookup(head).is_some()
}

pub fn known_heads() -> Vec<&'static str> {
    HEAD_RECIPES.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("let"), Some(Recipe::Let));
        assert_eq!(lookup("for-lt"), lookup("forlt"));
        assert_eq!(lookup("<="), Some(Recipe::Binary(BinaryOp::Le)));
        assert_eq!(lookup("frob"), None);
        assert!(!is_head("while"));
    }

    #[test]
    fn test_recipe_tags_match_ast_spelling() {
        assert_eq!(lookup("^^").map(|r| r.tag().as_str()), Some("bit-xor"));
        assert_eq!(lookup("~").map(|r| r.tag().as_str()), Some("bit-not"));
        assert_eq!(lookup("for-lt").map(|r| r.tag().as_str()), Some("forlt"));
        assert_eq!(lookup("?").map(|r| r.tag().as_str()), Some("?"));
    }

    #[test]
    fn test_heads_are_unique() {
        let heads = known_heads();
        let mut sorted = heads.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(heads.len(), sorted.len());
    }

    #[test]
    fn test_variadic_recipes() {
        assert!(Recipe::Call.is_variadic());
        assert!(Recipe::ForLt.is_variadic());
        assert!(!Recipe::If.is_variadic());
    }
}
