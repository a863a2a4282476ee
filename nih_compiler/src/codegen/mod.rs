//! Code generation - AST to JavaScript source

mod error;
pub mod js;
pub mod prelude;

pub use error::{EmitError, EmitResult};
pub use js::{EmitMetrics, JsEmitter};

use crate::config::runtime::EmitterPreferences;
use crate::grammar::ast::Node;
use crate::logging::codes;

/// Emit a module with default preferences
pub fn emit_js(module: &Node) -> EmitResult<String> {
    JsEmitter::new().emit_module(module)
}

pub fn emit_js_with_preferences(
    module: &Node,
    preferences: EmitterPreferences,
) -> EmitResult<String> {
    JsEmitter::with_preferences(preferences).emit_module(module)
}

/// Check that every emission error code is registered with metadata
pub fn init_codegen_logging() -> Result<(), String> {
    let emission_codes = [
        codes::emission::UNHANDLED_NODE,
        codes::emission::STATEMENT_IN_EXPRESSION,
        codes::emission::MAX_EMIT_DEPTH,
    ];

    for code in &emission_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Emission error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::syntax::parse_token_stream;

    #[test]
    fn test_init_logging() {
        assert!(init_codegen_logging().is_ok());
    }

    #[test]
    fn test_emit_js_includes_prelude() {
        let module = parse_token_stream(tokenize("(call print 'Hiihoo')").unwrap()).unwrap();
        let code = emit_js(&module).unwrap();
        assert!(code.starts_with(prelude::JS_PRELUDE));
        assert!(code.contains("nih_print(\"Hiihoo\")"));
    }

    #[test]
    fn test_prelude_can_be_disabled() {
        let module = parse_token_stream(tokenize("(let a 1)").unwrap()).unwrap();
        let preferences = EmitterPreferences {
            include_library_prelude: false,
            ..Default::default()
        };
        assert_eq!(emit_js_with_preferences(&module, preferences).unwrap(), "let a = 1;\n");
    }
}
