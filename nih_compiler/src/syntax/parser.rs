//! Recursive-descent parser over the token stream
//!
//! A module is a sequence of top-level forms. A parenthesized form starts
//! with a head symbol that selects a recipe from `recipes::HEAD_RECIPES`;
//! the recipe fixes which slots (identifier, expression, block, ...) follow.
//! Heads may be spelled by several adjacent tokens (`do` `-` `while`) since
//! the ordered tables split them during lexing.

use crate::config::compile_time::syntax::*;
use crate::grammar::ast::{Node, NodeKind, Tag};
use crate::logging::codes;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::syntax::recipes::{self, Recipe, MAX_COMPOUND_HEAD_TOKENS};
use crate::tokens::{Dialect, SpannedToken, Token, TokenClass, TokenStream, TokenStreamError};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};

/// The form currently being parsed, for close-paren diagnostics
struct FormHead {
    name: String,
    opened: Position,
}

pub struct NihParser {
    tokens: TokenStream,
    context_stack: Vec<String>,
    parse_depth: usize,
    max_depth_reached: usize,
}

fn is_joinable(token: &Token) -> bool {
    matches!(
        token.class,
        TokenClass::Identifier | TokenClass::Keyword | TokenClass::Operator
    ) && !token.is_open_paren()
        && !token.is_close_paren()
}

impl NihParser {
    pub fn new(tokens: TokenStream) -> Self {
        log_debug!("Creating parser", "tokens" => tokens.len());

        Self {
            tokens,
            context_stack: Vec::new(),
            parse_depth: 0,
            max_depth_reached: 0,
        }
    }

    /// Parse every top-level form into a `module` node
    pub fn parse_module(&mut self) -> SyntaxResult<Node> {
        match self.parse_module_forms() {
            Ok(module) => {
                log_success!(codes::success::AST_CONSTRUCTION_COMPLETE, "AST construction completed",
                    "forms" => module.children().len(),
                    "nodes" => module.node_count(),
                    "max_depth" => self.max_depth_reached
                );
                Ok(module)
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    span = error.span(),
                    "context" => self.current_context(),
                    "position" => self.tokens.position()
                );
                Err(error)
            }
        }
    }

    fn parse_module_forms(&mut self) -> SyntaxResult<Node> {
        let start = self.tokens.current_span();
        let mut forms = Vec::new();

        while !self.tokens.is_at_end() {
            let form = match self.tokens.current_dialect() {
                Dialect::SExpr => self.parse_expr("top-level form")?,
                Dialect::Default => {
                    let current = self.tokens.current();
                    if !current.value.is_open_paren() {
                        return Err(SyntaxError::UnsupportedDialect {
                            found: current.value.describe(),
                            span: current.span,
                        });
                    }
                    self.parse_list()?
                }
            };
            forms.push(form);
        }

        let span = start.merge(self.tokens.current_span());
        Ok(Node::new(NodeKind::Module { forms }, span))
    }

    // === ATOMS AND EXPRESSIONS ===

    /// An atom or a parenthesized form
    fn parse_expr(&mut self, expected: &str) -> SyntaxResult<Node> {
        let current = self.tokens.current().clone();
        let token = &current.value;
        let annotation = token.type_annotation.clone();

        match token.class {
            TokenClass::Eof => Err(SyntaxError::unexpected_end_of_input(expected, current.span)),
            TokenClass::StringLiteral => {
                self.tokens.advance();
                Ok(Node::str_lit(token.text.clone(), current.span).with_annotation(annotation))
            }
            TokenClass::NumberLiteral => {
                self.tokens.advance();
                let value = parse_number(&token.text, current.span)?;
                Ok(Node::num_lit(value, token.text.clone(), current.span).with_annotation(annotation))
            }
            TokenClass::Identifier => {
                self.tokens.advance();
                Ok(Node::ident(token.text.clone(), current.span).with_annotation(annotation))
            }
            TokenClass::Operator if token.is_open_paren() => self.parse_list(),
            TokenClass::Operator if token.text == "-" && self.negative_literal_follows() => {
                self.tokens.advance();
                let number = self.tokens.advance();
                let text = format!("-{}", number.value.text);
                let span = current.span.merge(number.span);
                let value = parse_number(&text, span)?;
                Ok(Node::num_lit(value, text, span)
                    .with_annotation(annotation.or(number.value.type_annotation)))
            }
            _ => Err(SyntaxError::unexpected_token(
                expected,
                &token.describe(),
                current.span,
            )),
        }
    }

    /// `-` immediately followed by a number literal
    fn negative_literal_follows(&self) -> bool {
        let minus = self.tokens.current();
        let next = self.tokens.peek();
        next.value.class == TokenClass::NumberLiteral
            && next.span.start.offset == minus.span.end.offset
    }

    fn parse_ident(&mut self) -> SyntaxResult<Node> {
        let current = self.tokens.current().clone();
        match current.value.class {
            TokenClass::Identifier => {
                self.tokens.advance();
                Ok(Node::ident(current.value.text, current.span)
                    .with_annotation(current.value.type_annotation))
            }
            TokenClass::Eof => Err(SyntaxError::unexpected_end_of_input(
                "identifier",
                current.span,
            )),
            _ => Err(SyntaxError::unexpected_token(
                "identifier",
                &current.value.describe(),
                current.span,
            )),
        }
    }

    fn parse_strlit(&mut self) -> SyntaxResult<Node> {
        let current = self.tokens.current().clone();
        match current.value.class {
            TokenClass::StringLiteral => {
                self.tokens.advance();
                Ok(Node::str_lit(current.value.text, current.span)
                    .with_annotation(current.value.type_annotation))
            }
            TokenClass::Eof => Err(SyntaxError::unexpected_end_of_input(
                "string literal",
                current.span,
            )),
            _ => Err(SyntaxError::unexpected_token(
                "string literal",
                &current.value.describe(),
                current.span,
            )),
        }
    }

    /// A bare type name, or the annotation carried by the closing paren
    fn parse_type(&mut self) -> SyntaxResult<Node> {
        let current = self.tokens.current().clone();
        if current.value.class == TokenClass::Identifier {
            self.tokens.advance();
            return Ok(Node::type_name(current.value.text, current.span));
        }
        if current.value.is_close_paren() {
            if let Some(annotation) = current.value.type_annotation {
                return Ok(Node::type_name(annotation, current.span));
            }
        }
        if current.value.is_eof() {
            return Err(SyntaxError::unexpected_end_of_input("type name", current.span));
        }
        Err(SyntaxError::unexpected_token(
            "type name",
            &current.value.describe(),
            current.span,
        ))
    }

    fn boxed_expr(&mut self) -> SyntaxResult<Box<Node>> {
        self.parse_expr("expression").map(Box::new)
    }

    fn boxed_ident(&mut self) -> SyntaxResult<Box<Node>> {
        self.parse_ident().map(Box::new)
    }

    // === FORMS ===

    fn enter(&mut self, span: Span) -> SyntaxResult<()> {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                depth: MAX_PARSE_DEPTH,
                span,
            });
        }
        self.parse_depth += 1;
        self.max_depth_reached = self.max_depth_reached.max(self.parse_depth);
        Ok(())
    }

    fn leave(&mut self) {
        self.parse_depth = self.parse_depth.saturating_sub(1);
    }

    /// `( head child* )`
    fn parse_list(&mut self) -> SyntaxResult<Node> {
        self.enter(self.tokens.current_span())?;
        let result = self.parse_list_inner();
        self.leave();
        result
    }

    fn parse_list_inner(&mut self) -> SyntaxResult<Node> {
        let open = self.tokens.advance();
        let current = self.tokens.current().clone();

        if current.value.is_close_paren() {
            self.tokens.advance();
            return Err(SyntaxError::EmptyList {
                span: open.span.merge(current.span),
            });
        }
        if current.value.is_eof() {
            return Err(SyntaxError::MissingCloseParen {
                head: String::new(),
                opened: open.span.start,
                span: current.span,
            });
        }

        let (name, head_span, head_annotation) = self.parse_head()?;
        let Some(recipe) = recipes::lookup(&name) else {
            return Err(SyntaxError::unknown_head(&name, head_span));
        };

        let head = FormHead {
            name,
            opened: open.span.start,
        };
        self.context_stack.push(head.name.clone());
        let kind = self.parse_recipe(recipe, &head);
        self.context_stack.pop();
        let kind = kind?;
        let close = self.expect_close(&head)?;

        let form_annotation = open
            .value
            .type_annotation
            .or(head_annotation)
            .or(close.value.type_annotation);
        let annotation = match &kind {
            NodeKind::Param { name } => name.type_annotation.clone().or(form_annotation),
            _ => form_annotation,
        };

        Ok(Node::new(kind, open.span.merge(close.span)).with_annotation(annotation))
    }

    /// Head symbol, joining up to three adjacent tokens when the joined
    /// spelling names a recipe
    fn parse_head(&mut self) -> SyntaxResult<(String, Span, Option<String>)> {
        let first = self.tokens.current().clone();
        if !is_joinable(&first.value) {
            let shown = match first.value.class {
                TokenClass::StringLiteral => format!("'{}'", first.value.text),
                _ => first.value.text.clone(),
            };
            return Err(SyntaxError::unknown_head(&shown, first.span));
        }

        for len in (2..=MAX_COMPOUND_HEAD_TOKENS).rev() {
            if let Some((text, span)) = self.joined_head(len) {
                if recipes::is_head(&text) {
                    for _ in 0..len {
                        self.tokens.advance();
                    }
                    log_debug!("Joined compound head", "head" => text, "tokens" => len);
                    return Ok((text, span, first.value.type_annotation));
                }
            }
        }

        self.tokens.advance();
        Ok((first.value.text, first.span, first.value.type_annotation))
    }

    fn joined_head(&self, len: usize) -> Option<(String, Span)> {
        let mut text = String::new();
        let mut span = self.tokens.current_span();
        let mut previous_end: Option<usize> = None;

        for i in 0..len {
            let token = self.tokens.peek_ahead(i);
            if !is_joinable(&token.value) {
                return None;
            }
            if previous_end.is_some_and(|end| token.span.start.offset != end) {
                return None;
            }
            text.push_str(&token.value.text);
            span = span.merge(token.span);
            previous_end = Some(token.span.end.offset);
        }

        Some((text, span))
    }

    fn parse_recipe(&mut self, recipe: Recipe, head: &FormHead) -> SyntaxResult<NodeKind> {
        let kind = match recipe {
            Recipe::Doc => NodeKind::Doc {
                text: Box::new(self.parse_strlit()?),
            },
            Recipe::Let => NodeKind::Let {
                name: self.boxed_ident()?,
                value: self.boxed_expr()?,
            },
            Recipe::Set => NodeKind::Set {
                name: self.boxed_ident()?,
                value: self.boxed_expr()?,
            },
            Recipe::Inc => NodeKind::Inc {
                name: self.boxed_ident()?,
            },
            Recipe::Return => NodeKind::Return {
                value: self.boxed_expr()?,
            },
            Recipe::Cast => NodeKind::Cast {
                value: self.boxed_expr()?,
                target: Box::new(self.parse_type()?),
            },
            Recipe::Param => NodeKind::Param {
                name: self.boxed_ident()?,
            },
            Recipe::Ternary => NodeKind::Ternary {
                cond: self.boxed_expr()?,
                then: self.boxed_expr()?,
                otherwise: self.boxed_expr()?,
            },
            Recipe::Member => NodeKind::Member {
                object: self.boxed_expr()?,
                property: self.boxed_ident()?,
            },
            Recipe::DoWhile => NodeKind::DoWhile {
                body: Box::new(self.parse_block()?),
                cond: self.boxed_expr()?,
            },
            Recipe::Binary(op) => NodeKind::Binary {
                op,
                lhs: self.boxed_expr()?,
                rhs: self.boxed_expr()?,
            },
            Recipe::Sign(unary, binary) => {
                let first = self.boxed_expr()?;
                if self.at_form_end(head)? {
                    NodeKind::Unary {
                        op: unary,
                        operand: first,
                    }
                } else {
                    NodeKind::Binary {
                        op: binary,
                        lhs: first,
                        rhs: self.boxed_expr()?,
                    }
                }
            }
            Recipe::Unary(op) => NodeKind::Unary {
                op,
                operand: self.boxed_expr()?,
            },
            Recipe::If => {
                let cond = self.boxed_expr()?;
                let then = self.boxed_expr()?;
                let otherwise = if self.at_form_end(head)? {
                    None
                } else {
                    Some(self.boxed_expr()?)
                };
                NodeKind::If {
                    cond,
                    then,
                    otherwise,
                }
            }
            Recipe::Call => NodeKind::Call {
                callee: self.boxed_expr()?,
                args: self.parse_rest(head)?,
            },
            Recipe::Do => NodeKind::Do {
                stmts: self.parse_rest(head)?,
            },
            Recipe::Fn => NodeKind::Fn {
                params: Box::new(self.parse_nested_form("plist")?),
                body: self.parse_rest(head)?,
            },
            Recipe::PList => {
                let mut params = Vec::new();
                while !self.at_form_end(head)? {
                    self.check_child_count(params.len())?;
                    params.push(self.parse_nested_form("param")?);
                }
                NodeKind::PList { params }
            }
            Recipe::ForLt => NodeKind::ForLt {
                var: self.boxed_ident()?,
                start: self.boxed_expr()?,
                end: self.boxed_expr()?,
                body: self.parse_rest(head)?,
            },
        };
        Ok(kind)
    }

    /// A form that must be headed by `head`, such as the `plist` of a `fn`
    fn parse_nested_form(&mut self, head: &str) -> SyntaxResult<Node> {
        let expected = format!("({} ...)", head);
        let current = self.tokens.current().clone();
        if current.value.is_eof() {
            return Err(SyntaxError::unexpected_end_of_input(&expected, current.span));
        }
        if current.value.is_open_paren() && self.tokens.peek().value.is_symbol(head) {
            return self.parse_list();
        }
        Err(SyntaxError::unexpected_token(
            &expected,
            &current.value.describe(),
            current.span,
        ))
    }

    /// A `(do ...)` form, a bare `( stmt* )` list, or a single form that is
    /// wrapped into a `do` node
    fn parse_block(&mut self) -> SyntaxResult<Node> {
        let current = self.tokens.current().clone();
        if current.value.is_eof() {
            return Err(SyntaxError::unexpected_end_of_input("block", current.span));
        }
        if !current.value.is_open_paren() {
            return Err(SyntaxError::unexpected_token(
                "block '( ... )'",
                &current.value.describe(),
                current.span,
            ));
        }

        if self.tokens.peek().value.is_open_paren() {
            self.enter(current.span)?;
            let result = self.parse_bare_block();
            self.leave();
            return result;
        }

        let form = self.parse_list()?;
        if form.tag() == Tag::Do {
            return Ok(form);
        }
        let span = form.span;
        Ok(Node::new(NodeKind::Do { stmts: vec![form] }, span))
    }

    fn parse_bare_block(&mut self) -> SyntaxResult<Node> {
        let open = self.tokens.advance();
        let head = FormHead {
            name: "do".to_string(),
            opened: open.span.start,
        };
        let stmts = self.parse_rest(&head)?;
        let close = self.expect_close(&head)?;
        let annotation = open.value.type_annotation.or(close.value.type_annotation);
        Ok(Node::new(NodeKind::Do { stmts }, open.span.merge(close.span)).with_annotation(annotation))
    }

    /// Expressions up to the closing paren of `head`
    fn parse_rest(&mut self, head: &FormHead) -> SyntaxResult<Vec<Node>> {
        let mut items = Vec::new();
        while !self.at_form_end(head)? {
            self.check_child_count(items.len())?;
            items.push(self.parse_expr("expression or ')'")?);
        }
        Ok(items)
    }

    fn check_child_count(&self, count: usize) -> SyntaxResult<()> {
        if count >= MAX_LIST_CHILDREN {
            return Err(SyntaxError::TooManyChildren {
                count: count + 1,
                max: MAX_LIST_CHILDREN,
                span: self.tokens.current_span(),
            });
        }
        Ok(())
    }

    /// True at `)`; end of input here means the form was never closed
    fn at_form_end(&self, head: &FormHead) -> SyntaxResult<bool> {
        let current = self.tokens.current();
        if current.value.is_close_paren() {
            Ok(true)
        } else if current.value.is_eof() {
            Err(SyntaxError::MissingCloseParen {
                head: head.name.clone(),
                opened: head.opened,
                span: current.span,
            })
        } else {
            Ok(false)
        }
    }

    fn expect_close(&mut self, head: &FormHead) -> SyntaxResult<SpannedToken> {
        self.tokens.expect_symbol(")").map_err(|error| match error {
            TokenStreamError::UnexpectedEndOfStream { span, .. } => SyntaxError::MissingCloseParen {
                head: head.name.clone(),
                opened: head.opened,
                span,
            },
            TokenStreamError::UnexpectedToken { found, span, .. } => {
                SyntaxError::unexpected_token("')'", &found, span)
            }
        })
    }

    // === DIAGNOSTICS ===

    pub fn current_context(&self) -> String {
        if self.context_stack.is_empty() {
            "module".to_string()
        } else {
            format!("module > {}", self.context_stack.join(" > "))
        }
    }

    pub fn max_depth_reached(&self) -> usize {
        self.max_depth_reached
    }

}

fn parse_number(text: &str, span: Span) -> SyntaxResult<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SyntaxError::InvalidNumber {
            text: text.to_string(),
            span,
        })
}

/// Parse a token stream into a `module` node
pub fn parse_token_stream(tokens: TokenStream) -> SyntaxResult<Node> {
    NihParser::new(tokens).parse_module()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Arity, BinaryOp, UnaryOp};
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> SyntaxResult<Node> {
        let tokens = tokenize(source).expect("source should lex");
        parse_token_stream(tokens)
    }

    fn sexpr(body: &str) -> SyntaxResult<Node> {
        parse(&format!("#lang = nih-sexpr\n{}", body))
    }

    fn first_form(body: &str) -> Node {
        let module = sexpr(body).unwrap();
        match module.kind {
            NodeKind::Module { mut forms } => forms.remove(0),
            other => panic!("expected module, got {:?}", other),
        }
    }

    fn assert_arity_holds(node: &Node) {
        node.walk(&mut |n| {
            let count = n.children().len();
            assert!(
                n.tag().arity().allows(count),
                "{} has {} children, allowed {}",
                n.tag(),
                count,
                n.tag().arity()
            );
        });
    }

    #[test]
    fn test_let_form() {
        let node = first_form("(let W 16)");
        assert_eq!(node.to_string(), "(let (ident W) (numlit 16))");
        assert_eq!(node.span.start.line, 2);
    }

    #[test]
    fn test_module_collects_top_level_forms() {
        let module = sexpr("(let a 1) x 'str' 2").unwrap();
        assert_eq!(module.tag(), Tag::Module);
        assert_eq!(module.children().len(), 4);
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let err = sexpr("(let x").unwrap_err();
        assert_matches!(err, SyntaxError::UnexpectedEndOfInput { .. });
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_missing_close_paren() {
        assert_matches!(
            sexpr("(let x 1"),
            Err(SyntaxError::MissingCloseParen { ref head, .. }) if head == "let"
        );
        assert_matches!(
            sexpr("(do (call f)"),
            Err(SyntaxError::MissingCloseParen { ref head, .. }) if head == "do"
        );
        assert_matches!(sexpr("("), Err(SyntaxError::MissingCloseParen { .. }));
    }

    #[test]
    fn test_unknown_head_and_empty_list() {
        assert_matches!(
            sexpr("(frob 1 2)"),
            Err(SyntaxError::UnknownHeadSymbol { ref head, .. }) if head == "frob"
        );
        assert_matches!(sexpr("(let x ())"), Err(SyntaxError::EmptyList { .. }));
        assert_matches!(sexpr("(1 2)"), Err(SyntaxError::UnknownHeadSymbol { .. }));
    }

    #[test]
    fn test_wrong_token_class() {
        assert_matches!(
            sexpr("(let 1 2)"),
            Err(SyntaxError::UnexpectedToken { ref expected, .. }) if expected == "identifier"
        );
        assert_matches!(
            sexpr("(let x 1 2)"),
            Err(SyntaxError::UnexpectedToken { ref expected, .. }) if expected == "')'"
        );
        assert_matches!(sexpr(")"), Err(SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_default_dialect_only_accepts_lists() {
        let module = parse("(let x 1)").unwrap();
        assert_eq!(module.children().len(), 1);

        let err = parse("int x = 1").unwrap_err();
        assert_matches!(err, SyntaxError::UnsupportedDialect { .. });
        assert!(err.help().is_some_and(|h| h.contains("#lang = nih-sexpr")));

        assert_matches!(
            parse("#lang = nih-sexpr\nx\n#lang = nih-c\ny"),
            Err(SyntaxError::UnsupportedDialect { ref found, .. }) if found.contains('y')
        );
    }

    #[test]
    fn test_sign_heads() {
        assert_eq!(first_form("(- x)").tag(), Tag::UnaryMinus);
        assert_eq!(first_form("(+ x)").tag(), Tag::UnaryPlus);
        assert_eq!(first_form("(- x y)").tag(), Tag::Sub);
        assert_matches!(
            first_form("(~ x)").kind,
            NodeKind::Unary { op: UnaryOp::BitNot, .. }
        );
        assert_eq!(first_form("(! x)").tag(), Tag::Not);
    }

    #[test]
    fn test_compound_heads() {
        assert_matches!(first_form("(<= a b)").kind, NodeKind::Binary { op: BinaryOp::Le, .. });
        assert_matches!(first_form("(>= a b)").kind, NodeKind::Binary { op: BinaryOp::Ge, .. });
        assert_matches!(first_form("(^^ a b)").kind, NodeKind::Binary { op: BinaryOp::BitXor, .. });
        assert_eq!(first_form("(< a b)").tag(), Tag::Lt);
        assert_eq!(first_form("(for-lt i 0 10 (call print i))").tag(), Tag::ForLt);
        assert_eq!(first_form("(forlt i 0 10)").tag(), Tag::ForLt);

        let node = first_form("(do-while ((inc! n)) (< n 3))");
        assert_eq!(node.tag(), Tag::DoWhile);
        assert_eq!(node.children()[0].tag(), Tag::Do);
    }

    #[test]
    fn test_negative_literal_fold() {
        let node = first_form("(let rs -2.5)");
        let value = node.children()[1];
        assert_matches!(
            &value.kind,
            NodeKind::NumLit { value, text } if *value == -2.5 && text == "-2.5"
        );
        assert_eq!(first_form("(- 2)").tag(), Tag::UnaryMinus);
    }

    #[test]
    fn test_if_and_ternary() {
        assert_eq!(first_form("(if c (call a))").children().len(), 2);
        assert_eq!(first_form("(if c (call a) (call b))").children().len(), 3);
        assert_eq!(first_form("(? c 1 2)").children().len(), 3);
        assert_matches!(sexpr("(? c 1)"), Err(SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_fn_plist_param_annotations() {
        let node = first_form(
            "(let f (fn (plist (param :float cx) (param y) :float) (return cx)))",
        );
        let func = node.children()[1];
        assert_eq!(func.tag(), Tag::Fn);
        let plist = func.children()[0];
        assert_eq!(plist.tag(), Tag::PList);
        assert_eq!(plist.type_annotation.as_deref(), Some("float"));
        let params = plist.children();
        assert_eq!(params[0].type_annotation.as_deref(), Some("float"));
        assert_eq!(params[1].type_annotation.as_deref(), None);
    }

    #[test]
    fn test_param_type_from_closing_paren() {
        let node = first_form("(fn (plist (param y :int)))");
        let param = node.children()[0].children()[0];
        assert_eq!(param.tag(), Tag::Param);
        assert_eq!(param.type_annotation.as_deref(), Some("int"));
    }

    #[test]
    fn test_plist_requires_param_forms() {
        assert_matches!(
            sexpr("(fn (plist x))"),
            Err(SyntaxError::UnexpectedToken { ref expected, .. }) if expected == "(param ...)"
        );
        assert_matches!(
            sexpr("(fn (call f))"),
            Err(SyntaxError::UnexpectedToken { ref expected, .. }) if expected == "(plist ...)"
        );
    }

    #[test]
    fn test_annotation_precedence() {
        assert_eq!(
            first_form(":int (call f)").type_annotation.as_deref(),
            Some("int")
        );
        assert_eq!(
            first_form("(:float call f)").type_annotation.as_deref(),
            Some("float")
        );
        assert_eq!(
            first_form("(call f :s32)").type_annotation.as_deref(),
            Some("s32")
        );
        assert_eq!(
            first_form(":int (:float call f :s32)").type_annotation.as_deref(),
            Some("int")
        );
    }

    #[test]
    fn test_cast_type_slot() {
        let node = first_form("(cast x int)");
        assert_eq!(node.children()[1].to_string(), "(type int)");
        let node = first_form("(cast x :float)");
        assert_eq!(node.children()[1].to_string(), "(type float)");
        assert_matches!(sexpr("(cast x)"), Err(SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_member_access() {
        let node = first_form("(call console.log 'hi')");
        let callee = node.children()[0];
        assert_eq!(callee.to_string(), "(. (ident console) (ident log))");
    }

    #[test]
    fn test_doc_requires_string() {
        assert_eq!(first_form("(doc 'hello')").tag(), Tag::Doc);
        assert_matches!(sexpr("(doc x)"), Err(SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_recursion_limit() {
        let deep = format!("{}x{}", "(- ".repeat(MAX_PARSE_DEPTH + 1), ")".repeat(MAX_PARSE_DEPTH + 1));
        assert_matches!(sexpr(&deep), Err(SyntaxError::MaxRecursionDepth { .. }));
    }

    #[test]
    fn test_arity_walk_over_program() {
        let module = sexpr(
            "(doc 'demo')
             (let W 16)
             (set! acc 0.0)
             (let f (fn (plist (param a) (param b)) (return (+ a b))))
             (for-lt i 0 W
               (if (<= i 3) (set! acc (+ acc 1)) (inc! acc))
               (call print (? (> acc 2) 'big' 'small')))
             (do-while ((inc! acc)) (< acc 10))
             (call printlf)
             (let z (cast (/ acc 2) int))
             (let m (. Math PI))",
        )
        .unwrap();
        assert_arity_holds(&module);
        assert_eq!(module.children().len(), 9);
        assert_eq!(Tag::If.arity(), Arity::Range(2, 3));
    }
}
