//! Token definitions
//!
//! A token is a class plus the exact text it was scanned from. Keywords and
//! operators keep their table spelling, string literals keep their unquoted
//! body, and number literals keep their digits.
use crate::grammar::langdef::{classify_word, WordClass};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenClass {
    Identifier,
    Keyword,
    Operator,
    StringLiteral,
    NumberLiteral,
    /// A `:name` annotation left over at end of input
    TypeAnnotation,
    Eof,
}

impl TokenClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Keyword => "keyword",
            Self::Operator => "operator",
            Self::StringLiteral => "string-literal",
            Self::NumberLiteral => "number-literal",
            Self::TypeAnnotation => "type-annotation",
            Self::Eof => "end-of-stream",
        }
    }

    /// Keyword and operator tokens both name fixed table entries
    pub fn is_keyword_or_operator(&self) -> bool {
        matches!(self, Self::Keyword | Self::Operator)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub class: TokenClass,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_annotation: Option<String>,
}

impl Token {
    pub fn new(class: TokenClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
            type_annotation: None,
        }
    }

    pub fn identifier(text: impl Into<String>) -> Self {
        Self::new(TokenClass::Identifier, text)
    }

    pub fn keyword(text: impl Into<String>) -> Self {
        Self::new(TokenClass::Keyword, text)
    }

    pub fn operator(text: impl Into<String>) -> Self {
        Self::new(TokenClass::Operator, text)
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(TokenClass::StringLiteral, text)
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::new(TokenClass::NumberLiteral, text)
    }

    pub fn eof() -> Self {
        Self::new(TokenClass::Eof, "")
    }

    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.type_annotation = annotation;
        self
    }

    pub fn is_eof(&self) -> bool {
        self.class == TokenClass::Eof
    }

    /// Operator or keyword token spelled exactly `text`
    pub fn is_symbol(&self, text: &str) -> bool {
        self.class.is_keyword_or_operator() && self.text == text
    }

    pub fn is_open_paren(&self) -> bool {
        self.is_symbol("(")
    }

    pub fn is_close_paren(&self) -> bool {
        self.is_symbol(")")
    }

    /// Table classification for identifiers and keywords
    pub fn word_class(&self) -> Option<WordClass> {
        match self.class {
            TokenClass::Identifier | TokenClass::Keyword => Some(classify_word(&self.text)),
            _ => None,
        }
    }

    /// Source-like spelling for diagnostics
    pub fn describe(&self) -> String {
        match self.class {
            TokenClass::Eof => "end of input".to_string(),
            TokenClass::StringLiteral => format!("string '{}'", self.text),
            TokenClass::TypeAnnotation => format!("type annotation ':{}'", self.text),
            _ => format!("{} '{}'", self.class, self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TokenClass::Eof => write!(f, "<EOF>")?,
            TokenClass::StringLiteral => write!(f, "{:?}", self.text)?,
            TokenClass::TypeAnnotation => write!(f, ":{}", self.text)?,
            _ => write!(f, "{}", self.text)?,
        }
        if let Some(annotation) = &self.type_annotation {
            write!(f, " :{}", annotation)?;
        }
        Ok(())
    }
}

/// Which grammar the parser applies to the tokens that follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// C-like infix dialect, only parenthesized forms are supported
    #[default]
    Default,
    SExpr,
}

impl Dialect {
    /// Dialect named by a `#lang = <name>` pragma
    pub fn from_pragma(name: &str) -> Option<Self> {
        match name {
            "nih-sexpr" => Some(Self::SExpr),
            "nih-c" | "nih" => Some(Self::Default),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "nih-c",
            Self::SExpr => "nih-sexpr",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pragma that takes effect starting at `token_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectSwitch {
    pub token_index: usize,
    pub dialect: Dialect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_checks_need_fixed_class() {
        assert!(Token::operator("(").is_open_paren());
        assert!(Token::keyword("let").is_symbol("let"));
        assert!(!Token::identifier("let").is_symbol("let"));
        assert!(!Token::string("(").is_open_paren());
    }

    #[test]
    fn test_word_class() {
        assert_eq!(Token::identifier("sqrt").word_class(), Some(WordClass::NativeFunc));
        assert_eq!(Token::keyword("fn").word_class(), Some(WordClass::Keyword));
        assert_eq!(Token::identifier("px").word_class(), Some(WordClass::Plain));
        assert_eq!(Token::number("1").word_class(), None);
    }

    #[test]
    fn test_display_and_describe() {
        let token = Token::identifier("cx").with_annotation(Some("float".into()));
        assert_eq!(token.to_string(), "cx :float");
        assert_eq!(Token::string("hi").to_string(), "\"hi\"");
        assert_eq!(Token::eof().describe(), "end of input");
        assert_eq!(Token::operator(")").describe(), "operator ')'");
    }

    #[test]
    fn test_dialect_pragmas() {
        assert_eq!(Dialect::from_pragma("nih-sexpr"), Some(Dialect::SExpr));
        assert_eq!(Dialect::from_pragma("nih-c"), Some(Dialect::Default));
        assert_eq!(Dialect::from_pragma("nih"), Some(Dialect::Default));
        assert_eq!(Dialect::from_pragma("lisp"), None);
        assert_eq!(Dialect::default(), Dialect::Default);
    }
}
