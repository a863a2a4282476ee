//! JavaScript emitter
//!
//! A single recursive walk over the AST. Statement positions produce whole
//! lines at the current indent; expression positions produce inline text
//! and reject statement-only forms. Every binary operation is parenthesized,
//! since the source language has no precedence to preserve.

use std::collections::HashSet;

use crate::codegen::error::{EmitError, EmitResult};
use crate::codegen::prelude;
use crate::config::compile_time::emitter::*;
use crate::config::runtime::EmitterPreferences;
use crate::grammar::ast::{BinaryOp, Node, NodeKind, UnaryOp};
use crate::logging::codes;
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};

/// Emission counters
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct EmitMetrics {
    pub statements: usize,
    pub expressions: usize,
    pub bindings: usize,
    pub rebindings: usize,
    pub max_depth: usize,
}

/// One lexical scope. Function scopes (module and `fn` bodies) also collect
/// the names first assigned inside nested blocks, declared at body start.
#[derive(Debug, Default)]
struct Scope {
    names: HashSet<String>,
    hoisted: Vec<String>,
    function: bool,
}

impl Scope {
    fn function() -> Self {
        Self {
            function: true,
            ..Self::default()
        }
    }
}

pub struct JsEmitter {
    preferences: EmitterPreferences,
    /// Innermost last
    scopes: Vec<Scope>,
    indent: usize,
    depth: usize,
    metrics: EmitMetrics,
}

impl JsEmitter {
    pub fn new() -> Self {
        Self::with_preferences(EmitterPreferences::default())
    }

    pub fn with_preferences(preferences: EmitterPreferences) -> Self {
        Self {
            preferences,
            scopes: Vec::new(),
            indent: 0,
            depth: 0,
            metrics: EmitMetrics::default(),
        }
    }

    /// Emit a whole module, prefixed by the library shim
    pub fn emit_module(&mut self, module: &Node) -> EmitResult<String> {
        log_debug!("Starting emission", "nodes" => module.node_count());

        self.scopes = vec![Scope::function()];
        self.indent = 0;
        self.depth = 0;
        self.metrics = EmitMetrics::default();

        match self.emit_program(module) {
            Ok(body) => {
                let mut code = String::new();
                if self.preferences.include_library_prelude {
                    code.push_str(prelude::JS_PRELUDE);
                }
                code.push_str(&body);

                log_success!(codes::success::EMISSION_COMPLETE, "JavaScript emission completed",
                    "statements" => self.metrics.statements,
                    "bytes" => code.len(),
                    "max_depth" => self.metrics.max_depth
                );
                Ok(code)
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(), span = error.span());
                Err(error)
            }
        }
    }

    pub fn metrics(&self) -> &EmitMetrics {
        &self.metrics
    }

    fn emit_program(&mut self, module: &Node) -> EmitResult<String> {
        let mut out = String::new();
        match &module.kind {
            NodeKind::Module { forms } => {
                for form in forms {
                    self.emit_stmt(form, &mut out)?;
                }
            }
            _ => self.emit_stmt(module, &mut out)?,
        }
        if let Some(scope) = self.scopes.first() {
            insert_hoisted(&mut out, 0, 0, &scope.hoisted);
        }
        Ok(out)
    }

    // === SCOPES ===

    fn push_scope(&mut self, function: bool) {
        self.scopes.push(Scope {
            function,
            ..Scope::default()
        });
    }

    fn pop_scope(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.names.insert(name.to_string());
        }
    }

    fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.names.contains(name))
    }

    fn declared_here(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.names.contains(name))
    }

    fn in_function_scope(&self) -> bool {
        self.scopes.last().is_some_and(|scope| scope.function)
    }

    /// Bind `name` in the enclosing function scope so it outlives the block
    fn hoist(&mut self, name: &str) {
        if let Some(scope) = self.scopes.iter_mut().rev().find(|scope| scope.function) {
            scope.names.insert(name.to_string());
            scope.hoisted.push(name.to_string());
        }
    }

    fn enter(&mut self, span: Span) -> EmitResult<()> {
        if self.depth >= MAX_EMIT_DEPTH {
            return Err(EmitError::MaxEmitDepth {
                depth: MAX_EMIT_DEPTH,
                span,
            });
        }
        self.depth += 1;
        self.metrics.max_depth = self.metrics.max_depth.max(self.depth);
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // === STATEMENTS ===

    fn line(&self, out: &mut String, text: &str) {
        out.push_str(&" ".repeat(self.indent * INDENT_WIDTH));
        out.push_str(text);
        out.push('\n');
    }

    fn emit_stmt(&mut self, node: &Node, out: &mut String) -> EmitResult<()> {
        self.enter(node.span)?;
        let result = self.emit_stmt_inner(node, out);
        self.leave();
        result
    }

    fn emit_stmt_inner(&mut self, node: &Node, out: &mut String) -> EmitResult<()> {
        self.metrics.statements += 1;

        match &node.kind {
            NodeKind::Module { forms } => {
                for form in forms {
                    self.emit_stmt(form, out)?;
                }
            }
            NodeKind::Do { stmts } => {
                for stmt in stmts {
                    self.emit_stmt(stmt, out)?;
                }
            }
            NodeKind::Doc { text } => {
                if self.preferences.emit_doc_comments {
                    if let NodeKind::StrLit { value } = &text.kind {
                        for doc_line in value.lines() {
                            self.line(out, format!("// {}", doc_line).trim_end());
                        }
                    }
                }
            }
            NodeKind::Let { name, value } => {
                let value = self.emit_expr(value)?;
                let name = binding_name(name)?;
                if self.declared_here(name) {
                    self.metrics.rebindings += 1;
                    self.line(out, &format!("{} = {};", name, value));
                } else {
                    self.declare(name);
                    self.metrics.bindings += 1;
                    self.line(out, &format!("let {} = {};", name, value));
                }
            }
            NodeKind::Set { name, value } => {
                let value = self.emit_expr(value)?;
                let name = binding_name(name)?;
                if self.is_bound(name) {
                    self.metrics.rebindings += 1;
                    self.line(out, &format!("{} = {};", name, value));
                } else if self.in_function_scope() {
                    self.declare(name);
                    self.metrics.bindings += 1;
                    self.line(out, &format!("let {} = {};", name, value));
                } else {
                    self.hoist(name);
                    self.metrics.bindings += 1;
                    self.line(out, &format!("{} = {};", name, value));
                }
            }
            NodeKind::Inc { name } => {
                let name = binding_name(name)?;
                self.line(out, &format!("{} += 1;", name));
            }
            NodeKind::Return { value } => {
                let value = self.emit_expr(value)?;
                self.line(out, &format!("return {};", value));
            }
            NodeKind::ForLt {
                var,
                start,
                end,
                body,
            } => {
                let var = binding_name(var)?.to_string();
                let start = self.emit_expr(start)?;
                let end = self.emit_expr(end)?;
                self.line(
                    out,
                    &format!(
                        "for (let {v} = {}; {v} < {}; {v}++) {{",
                        start,
                        end,
                        v = var
                    ),
                );
                self.emit_block(out, &[var.as_str()], body, false)?;
                self.line(out, "}");
            }
            NodeKind::DoWhile { body, cond } => {
                self.line(out, "do {");
                self.emit_block(out, &[], block_stmts(body), false)?;
                let cond = self.emit_expr(cond)?;
                self.line(out, &format!("}} while ({});", cond));
            }
            NodeKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.emit_expr(cond)?;
                self.line(out, &format!("if ({}) {{", cond));
                self.emit_block(out, &[], block_stmts(then), false)?;
                if let Some(otherwise) = otherwise {
                    self.line(out, "} else {");
                    self.emit_block(out, &[], block_stmts(otherwise), false)?;
                }
                self.line(out, "}");
            }
            NodeKind::PList { .. } | NodeKind::Param { .. } | NodeKind::Type { .. } => {
                return Err(EmitError::UnhandledNode {
                    tag: node.tag(),
                    span: node.span,
                });
            }
            _ => {
                let expr = self.emit_expr(node)?;
                self.line(out, &format!("{};", expr));
            }
        }
        Ok(())
    }

    /// Statements one indent deeper, in a fresh scope holding `bound`
    fn emit_block(
        &mut self,
        out: &mut String,
        bound: &[&str],
        stmts: &[Node],
        function: bool,
    ) -> EmitResult<()> {
        self.push_scope(function);
        for name in bound {
            self.declare(name);
        }
        self.indent += 1;
        let body_start = out.len();

        let result = stmts.iter().try_for_each(|stmt| self.emit_stmt(stmt, out));

        if let Some(scope) = self.pop_scope() {
            insert_hoisted(out, body_start, self.indent, &scope.hoisted);
        }
        self.indent -= 1;
        result
    }

    // === EXPRESSIONS ===

    fn emit_expr(&mut self, node: &Node) -> EmitResult<String> {
        self.enter(node.span)?;
        let result = self.emit_expr_inner(node);
        self.leave();
        result
    }

    fn emit_expr_inner(&mut self, node: &Node) -> EmitResult<String> {
        self.metrics.expressions += 1;

        let text = match &node.kind {
            NodeKind::StrLit { value } => serde_json::Value::String(value.clone()).to_string(),
            NodeKind::NumLit { value, .. } => format_number(*value),
            NodeKind::Ident { name } => self.identifier(name),
            NodeKind::Unary { op, operand } => {
                let operand = self.emit_expr(operand)?;
                let op = match op {
                    UnaryOp::Plus => "+",
                    UnaryOp::Minus => "-",
                    UnaryOp::BitNot => "~",
                    UnaryOp::Not => "!",
                };
                format!("({}{})", op, operand)
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let lhs = self.emit_expr(lhs)?;
                let rhs = self.emit_expr(rhs)?;
                match op {
                    BinaryOp::Pow => format!("Math.pow({}, {})", lhs, rhs),
                    _ => format!("({} {} {})", lhs, js_operator(*op), rhs),
                }
            }
            NodeKind::Fn { params, body } => self.emit_fn(params, body)?,
            NodeKind::Call { callee, args } => {
                let callee = self.emit_expr(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.emit_expr(arg))
                    .collect::<EmitResult<Vec<_>>>()?;
                format!("{}({})", callee, args.join(", "))
            }
            NodeKind::Cast { value, target } => {
                let value = self.emit_expr(value)?;
                let target = match &target.kind {
                    NodeKind::Type { name } => name.as_str(),
                    _ => "",
                };
                cast_expression(target, &value)
            }
            NodeKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.emit_expr(cond)?;
                let then = self.emit_expr(then)?;
                let otherwise = match otherwise {
                    Some(otherwise) => self.emit_expr(otherwise)?,
                    None => "undefined".to_string(),
                };
                format!("({} ? {} : {})", cond, then, otherwise)
            }
            NodeKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.emit_expr(cond)?;
                let then = self.emit_expr(then)?;
                let otherwise = self.emit_expr(otherwise)?;
                format!("({} ? {} : {})", cond, then, otherwise)
            }
            NodeKind::Member { object, property } => {
                let object = self.emit_expr(object)?;
                let property = property.ident_name().unwrap_or_default();
                format!("{}.{}", object, property)
            }
            NodeKind::PList { .. } | NodeKind::Param { .. } | NodeKind::Type { .. } => {
                return Err(EmitError::UnhandledNode {
                    tag: node.tag(),
                    span: node.span,
                });
            }
            NodeKind::Module { .. }
            | NodeKind::Doc { .. }
            | NodeKind::Let { .. }
            | NodeKind::Set { .. }
            | NodeKind::Inc { .. }
            | NodeKind::DoWhile { .. }
            | NodeKind::Return { .. }
            | NodeKind::ForLt { .. }
            | NodeKind::Do { .. } => {
                return Err(EmitError::StatementInExpression {
                    tag: node.tag(),
                    span: node.span,
                });
            }
        };
        Ok(text)
    }

    /// `((p, q) => { body })`
    fn emit_fn(&mut self, params: &Node, body: &[Node]) -> EmitResult<String> {
        let names = match &params.kind {
            NodeKind::PList { params } => params
                .iter()
                .map(|param| match &param.kind {
                    NodeKind::Param { name } => binding_name(name).map(str::to_string),
                    _ => Err(EmitError::UnhandledNode {
                        tag: param.tag(),
                        span: param.span,
                    }),
                })
                .collect::<EmitResult<Vec<_>>>()?,
            _ => {
                return Err(EmitError::UnhandledNode {
                    tag: params.tag(),
                    span: params.span,
                })
            }
        };

        let mut text = format!("(({}) => {{\n", names.join(", "));
        let bound: Vec<&str> = names.iter().map(String::as_str).collect();
        self.emit_block(&mut text, &bound, body, true)?;
        text.push_str(&" ".repeat(self.indent * INDENT_WIDTH));
        text.push_str("})");
        Ok(text)
    }

    /// Builtins map onto the shim or `Math` unless the program rebinds them
    fn identifier(&self, name: &str) -> String {
        if self.is_bound(name) {
            return name.to_string();
        }
        builtin_identifier(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.to_string())
    }
}

impl Default for JsEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// `let a, b;` at `at`, for names first assigned in nested blocks
fn insert_hoisted(out: &mut String, at: usize, indent: usize, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let declaration = format!(
        "{}let {};\n",
        " ".repeat(indent * INDENT_WIDTH),
        names.join(", ")
    );
    out.insert_str(at, &declaration);
}

const MATH_NATIVES: &[(&str, &str)] = &[
    ("abs", "Math.abs"),
    ("acos", "Math.acos"),
    ("asin", "Math.asin"),
    ("atan", "Math.atan"),
    ("ceil", "Math.ceil"),
    ("cos", "Math.cos"),
    ("exp", "Math.exp"),
    ("floor", "Math.floor"),
    ("log", "Math.log"),
    ("log2", "Math.log2"),
    ("min", "Math.min"),
    ("pow", "Math.pow"),
    ("sign", "Math.sign"),
    ("sin", "Math.sin"),
    ("sqrt", "Math.sqrt"),
    ("tan", "Math.tan"),
    ("trunc", "Math.trunc"),
];

const INTEGER_TYPES: &[&str] = &[
    "int", "uint", "char", "s8", "s16", "s32", "s64", "s128", "u8", "u16", "u32", "u64", "u128",
];

const FLOAT_TYPES: &[&str] = &["float", "f16", "f32", "f64"];

pub fn builtin_identifier(name: &str) -> Option<&'static str> {
    let mapped = match name {
        "print" => "nih_print",
        "printchars" => "nih_printchars",
        "printlf" => "nih_printlf",
        "rand" => "Math.random",
        _ => MATH_NATIVES
            .iter()
            .find(|(native, _)| *native == name)
            .map(|(_, js)| *js)?,
    };
    Some(mapped)
}

fn js_operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Pow => "**",
        BinaryOp::BitOr => "|",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitXor => "^",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::Eq => "===",
        BinaryOp::Ne => "!==",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
    }
}

pub fn cast_expression(target: &str, value: &str) -> String {
    if INTEGER_TYPES.contains(&target) {
        format!("Math.trunc(Number({}))", value)
    } else if FLOAT_TYPES.contains(&target) {
        format!("Number({})", value)
    } else if target == "string" {
        format!("String({})", value)
    } else if target == "bool" {
        format!("Boolean({})", value)
    } else {
        format!("({})", value)
    }
}

/// Shortest decimal that round-trips, which JS reads back as the same number
fn format_number(value: f64) -> String {
    if value.is_sign_negative() {
        format!("({})", value)
    } else {
        value.to_string()
    }
}

fn binding_name(node: &Node) -> EmitResult<&str> {
    node.ident_name().ok_or(EmitError::UnhandledNode {
        tag: node.tag(),
        span: node.span,
    })
}

/// Statements of a branch or loop body; a lone statement stands for itself
fn block_stmts(node: &Node) -> &[Node] {
    match &node.kind {
        NodeKind::Do { stmts } => stmts,
        _ => std::slice::from_ref(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::Tag;
    use crate::lexical::tokenize;
    use crate::syntax::parse_token_stream;
    use assert_matches::assert_matches;

    fn emit_body(body: &str) -> EmitResult<String> {
        let source = format!("#lang = nih-sexpr\n{}", body);
        let module = parse_token_stream(tokenize(&source).unwrap()).unwrap();
        let preferences = EmitterPreferences {
            include_library_prelude: false,
            emit_doc_comments: true,
        };
        JsEmitter::with_preferences(preferences).emit_module(&module)
    }

    fn emit(body: &str) -> String {
        emit_body(body).unwrap()
    }

    #[test]
    fn test_prelude_precedes_user_code() {
        let source = "(call print 'Hiihoo')";
        let module = parse_token_stream(tokenize(source).unwrap()).unwrap();
        let code = JsEmitter::new().emit_module(&module).unwrap();
        assert!(code.starts_with(prelude::JS_PRELUDE));
        assert!(code.contains("function nih_print("));
        assert!(code.ends_with("nih_print(\"Hiihoo\");\n"));
    }

    #[test]
    fn test_let_and_set_bindings() {
        assert_eq!(emit("(let W 16)"), "let W = 16;\n");
        assert_eq!(emit("(set! n 0) (set! n 1)"), "let n = 0;\nn = 1;\n");
        assert_eq!(emit("(set! n 0) (inc! n)"), "let n = 0;\nn += 1;\n");
    }

    #[test]
    fn test_set_rebinds_outer_scope() {
        let code = emit("(set! acc 0) (for-lt i 0 3 (set! acc (+ acc i)) (set! t i))");
        assert_eq!(
            code,
            "let t;\n\
             let acc = 0;\n\
             for (let i = 0; i < 3; i++) {\n  \
               acc = (acc + i);\n  \
               t = i;\n\
             }\n"
        );
    }

    #[test]
    fn test_set_after_let_rebinds() {
        assert_eq!(emit("(let x 1) (set! x 2)"), "let x = 1;\nx = 2;\n");
        assert_eq!(
            emit("(let x 1) (if c (set! x 2))"),
            "let x = 1;\nif (c) {\n  x = 2;\n}\n"
        );
        assert_eq!(emit("(let x 1) (let x 2)"), "let x = 1;\nx = 2;\n");
    }

    #[test]
    fn test_first_set_in_block_is_hoisted() {
        assert_eq!(
            emit("(if c (set! y 1)) (call print y)"),
            "let y;\nif (c) {\n  y = 1;\n}\nnih_print(y);\n"
        );
        assert_eq!(
            emit("(if c (set! y 1) (set! y 2))"),
            "let y;\nif (c) {\n  y = 1;\n} else {\n  y = 2;\n}\n"
        );
        assert_eq!(
            emit("(let f (fn (plist) (do-while (set! k 1) (< k 0)) (return k)))"),
            "let f = (() => {\n  let k;\n  do {\n    k = 1;\n  } while ((k < 0));\n  return k;\n});\n"
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(emit("(== a b)"), "(a === b);\n");
        assert_eq!(emit("(!= a b)"), "(a !== b);\n");
        assert_eq!(emit("(^ a 2)"), "Math.pow(a, 2);\n");
        assert_eq!(emit("(^^ a b)"), "(a ^ b);\n");
        assert_eq!(emit("(* (+ a b) c)"), "((a + b) * c);\n");
        assert_eq!(emit("(<= a b)"), "(a <= b);\n");
        assert_eq!(emit("(&& a (! b))"), "(a && (!b));\n");
        assert_eq!(emit("(- x)"), "(-x);\n");
        assert_eq!(emit("(- -2)"), "(-(-2));\n");
        assert_eq!(emit("(~ x)"), "(~x);\n");
    }

    #[test]
    fn test_numbers_and_strings() {
        assert_eq!(emit("(let a 1.5)"), "let a = 1.5;\n");
        assert_eq!(emit("(let a -2)"), "let a = (-2);\n");
        assert_eq!(emit("(let s 'a\"b')"), "let s = \"a\\\"b\";\n");
    }

    #[test]
    fn test_builtins_remap_unless_bound() {
        assert_eq!(emit("(call printlf)"), "nih_printlf();\n");
        assert_eq!(emit("(call printchars 'x')"), "nih_printchars(\"x\");\n");
        assert_eq!(emit("(call sqrt 2)"), "Math.sqrt(2);\n");
        assert_eq!(emit("(call rand)"), "Math.random();\n");
        assert_eq!(emit("(let sin 1) (call print sin)"), "let sin = 1;\nnih_print(sin);\n");
    }

    #[test]
    fn test_fn_closure() {
        assert_eq!(
            emit("(let add (fn (plist (param a) (param b)) (return (+ a b))))"),
            "let add = ((a, b) => {\n  return (a + b);\n});\n"
        );
        assert_eq!(
            emit("(call (fn (plist) (call print 1)))"),
            "(() => {\n  nih_print(1);\n})();\n"
        );
    }

    #[test]
    fn test_fn_params_shadow_builtins() {
        assert_eq!(
            emit("(let f (fn (plist (param abs)) (return abs)))"),
            "let f = ((abs) => {\n  return abs;\n});\n"
        );
    }

    #[test]
    fn test_control_flow() {
        assert_eq!(
            emit("(if (> x 1) (call print 'a') (call print 'b'))"),
            "if ((x > 1)) {\n  nih_print(\"a\");\n} else {\n  nih_print(\"b\");\n}\n"
        );
        assert_eq!(
            emit("(do-while ((inc! n) (call print n)) (< n 3))"),
            "do {\n  n += 1;\n  nih_print(n);\n} while ((n < 3));\n"
        );
        assert_eq!(emit("(let v (if c 1 2))"), "let v = (c ? 1 : 2);\n");
        assert_eq!(emit("(let v (if c 1))"), "let v = (c ? 1 : undefined);\n");
        assert_eq!(emit("(let v (? c 1 2))"), "let v = (c ? 1 : 2);\n");
    }

    #[test]
    fn test_member_and_cast() {
        assert_eq!(emit("(call console.log 1)"), "console.log(1);\n");
        assert_eq!(emit("(let p (. Math PI))"), "let p = Math.PI;\n");
        assert_eq!(emit("(let i (cast x int))"), "let i = Math.trunc(Number(x));\n");
        assert_eq!(emit("(let f (cast x f32))"), "let f = Number(x);\n");
        assert_eq!(emit("(let s (cast x string))"), "let s = String(x);\n");
        assert_eq!(emit("(let b (cast x bool))"), "let b = Boolean(x);\n");
        assert_eq!(emit("(let v (cast x vec3))"), "let v = (x);\n");
    }

    #[test]
    fn test_doc_comments() {
        assert_eq!(emit("(doc 'line one\nline two')"), "// line one\n// line two\n");

        let source = "#lang = nih-sexpr\n(doc 'hidden') (let a 1)";
        let module = parse_token_stream(tokenize(source).unwrap()).unwrap();
        let preferences = EmitterPreferences {
            include_library_prelude: false,
            emit_doc_comments: false,
        };
        let code = JsEmitter::with_preferences(preferences).emit_module(&module).unwrap();
        assert_eq!(code, "let a = 1;\n");
    }

    #[test]
    fn test_statement_in_expression() {
        assert_matches!(
            emit_body("(let a (let b 1))"),
            Err(EmitError::StatementInExpression { tag: Tag::Let, .. })
        );
        assert_matches!(
            emit_body("(call f (do (call g)))"),
            Err(EmitError::StatementInExpression { tag: Tag::Do, .. })
        );
    }

    #[test]
    fn test_orphan_param_is_unhandled() {
        assert_matches!(
            emit_body("(param x)"),
            Err(EmitError::UnhandledNode { tag: Tag::Param, .. })
        );
        assert_matches!(
            emit_body("(plist)"),
            Err(EmitError::UnhandledNode { tag: Tag::PList, .. })
        );
    }

    #[test]
    fn test_emit_depth_limit() {
        let mut node = Node::ident("x", Span::dummy());
        for _ in 0..=MAX_EMIT_DEPTH {
            node = Node::new(
                NodeKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(node),
                },
                Span::dummy(),
            );
        }
        let module = Node::new(NodeKind::Module { forms: vec![node] }, Span::dummy());
        assert_matches!(
            JsEmitter::new().emit_module(&module),
            Err(EmitError::MaxEmitDepth { .. })
        );
    }

    #[test]
    fn test_cast_table() {
        assert_eq!(cast_expression("u8", "v"), "Math.trunc(Number(v))");
        assert_eq!(cast_expression("f64", "v"), "Number(v)");
        assert_eq!(builtin_identifier("print"), Some("nih_print"));
        assert_eq!(builtin_identifier("floor"), Some("Math.floor"));
        assert_eq!(builtin_identifier("frob"), None);
    }
}
