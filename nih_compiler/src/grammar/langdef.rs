//! Language definition tables
//!
//! Each table is scanned in authored order and the first entry that matches
//! wins, so longer spellings listed after a shorter prefix (`<` before `<=`)
//! are never produced by `match_at`. The parser rebuilds those compound
//! spellings from adjacent tokens instead.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

pub const OPERATORS: &[&str] = &[
    // relational
    "<", "<=", ">", ">=", "==", "!=",
    // assignment
    "+=", "-=", "*=", "/=", "%=", "**=", "|>=", "=",
    // exponentiation; bitwise xor is `^^`
    "^",
    // spaced arithmetic
    " + ", " - ", " * ", " / ", " % ",
    // unary / arithmetic in s-expressions
    "+", "-", "*", "/",
    // piping
    "|>",
    // logical
    "!", "&&", "||",
    // logical / bitwise
    "&", "|",
    // bitwise
    "<<<", ">>>", "<<@", ">>@", "<<", ">>", "~", "^^",
    ".", "?", "(", ")",
    // type annotation marker
    ":",
];

pub const KEYWORDS: &[&str] = &[
    "alias", "break", "call", "case", "const", "continue", "dec", "default", "doc", "do", "else",
    "enum", "foreach", "forlt", "for", "fn", "get", "if", "inc!", "let", "pure", "return",
    "set!", "struct", "switch", "type", "uniform", "while", "plist", "param",
];

pub const NATIVE_TYPES: &[&str] = &[
    "bool", "bvec2", "bvec3", "bvec4", "char", "float", "f16", "f32", "f64", "int", "ivec2",
    "ivec3", "ivec4", "mat4x3", "mat3", "mat4", "s8", "s16", "s32", "s64", "s128", "sampler2D",
    "sampler3D", "samplerCube", "string", "texture", "uint", "u8", "u16", "u32", "u64", "u128",
    "uvec2", "uvec3", "uvec4", "vec2", "vec3", "vec4", "void",
];

pub const NATIVE_FUNCS: &[&str] = &[
    "abs", "asin", "acos", "atan", "ceil", "clamp", "cos", "cross", "degrees", "ddx", "ddy",
    "ddz", "distance", "dot", "exp2", "exp", "fract", "floor", "inverse", "invsqrt", "length",
    "lerp", "min", "mix", "mod", "normalize", "log2", "log", "radians", "rand", "rcl", "rcr",
    "rol", "ror", "pow", "printchars", "printlf", "print", "saturate", "sign", "sin",
    "smoothstep", "step", "sqrt", "tan", "texturesize", "transpose", "trunc",
];

pub const NATIVE_VARS: &[&str] = &[
    "CURSOR", "FRAMERATE", "FRAME", "RESOLUTION", "TIMEDELTA", "TIME", "SAMPLERATE",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Operator,
    Keyword,
    NativeType,
    NativeFunc,
    NativeVar,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Operator,
        Category::Keyword,
        Category::NativeType,
        Category::NativeFunc,
        Category::NativeVar,
    ];

    /// Entries in authored order
    pub fn words(self) -> &'static [&'static str] {
        match self {
            Category::Operator => OPERATORS,
            Category::Keyword => KEYWORDS,
            Category::NativeType => NATIVE_TYPES,
            Category::NativeFunc => NATIVE_FUNCS,
            Category::NativeVar => NATIVE_VARS,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A table entry found at a source offset, covering `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub text: &'static str,
    pub start: usize,
    pub end: usize,
}

/// First entry of `category` that `src` spells at byte offset `index`.
pub fn match_at(category: Category, src: &str, index: usize) -> Option<Match> {
    let rest = src.as_bytes().get(index..)?;
    category
        .words()
        .iter()
        .find(|word| rest.starts_with(word.as_bytes()))
        .map(|word| Match {
            text: word,
            start: index,
            end: index + word.len(),
        })
}

pub fn match_operator(src: &str, index: usize) -> Option<Match> {
    match_at(Category::Operator, src, index)
}

pub fn match_keyword(src: &str, index: usize) -> Option<Match> {
    match_at(Category::Keyword, src, index)
}

static MEMBERSHIP: OnceLock<[HashSet<&'static str>; 5]> = OnceLock::new();

fn membership(category: Category) -> &'static HashSet<&'static str> {
    let sets = MEMBERSHIP.get_or_init(|| {
        Category::ALL.map(|c| c.words().iter().copied().collect())
    });
    &sets[category.index()]
}

pub fn is_member(category: Category, name: &str) -> bool {
    membership(category).contains(name)
}

pub fn is_operator(name: &str) -> bool {
    is_member(Category::Operator, name)
}

pub fn is_keyword(name: &str) -> bool {
    is_member(Category::Keyword, name)
}

pub fn is_native_type(name: &str) -> bool {
    is_member(Category::NativeType, name)
}

pub fn is_native_func(name: &str) -> bool {
    is_member(Category::NativeFunc, name)
}

pub fn is_native_var(name: &str) -> bool {
    is_member(Category::NativeVar, name)
}

/// How a bare word relates to the language tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordClass {
    Keyword,
    NativeType,
    NativeFunc,
    NativeVar,
    /// Any other user name
    Plain,
}

pub fn classify_word(word: &str) -> WordClass {
    if is_keyword(word) {
        WordClass::Keyword
    } else if is_native_type(word) {
        WordClass::NativeType
    } else if is_native_func(word) {
        WordClass::NativeFunc
    } else if is_native_var(word) {
        WordClass::NativeVar
    } else {
        WordClass::Plain
    }
}
