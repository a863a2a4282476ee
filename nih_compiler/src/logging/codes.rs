//! Error and success codes with their classification metadata
//!
//! Every stage error exposes `error_code()` returning one of the constants
//! below; the registry maps each code to its category, severity and the
//! action a user should take.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Classification of one code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    /// A compile error: the stage stops and nothing is emitted
    const fn fatal(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable: false,
            requires_halt: true,
            description,
            recommended_action,
        }
    }

    /// A load failure reported to the caller without halting the process
    const fn rejected(
        code: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category: "FileProcessing",
            severity,
            recoverable,
            requires_halt: false,
            description,
            recommended_action,
        }
    }

    /// A milestone logged on success
    const fn milestone(
        code: &'static str,
        category: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity: Severity::Low,
            recoverable: true,
            requires_halt: false,
            description,
            recommended_action: "None",
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const CARRIAGE_RETURN: Code = Code::new("E025");
    pub const COMMENT_TOO_LONG: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const COMMENT_NESTING_TOO_DEEP: Code = Code::new("E028");
    pub const UNKNOWN_PRAGMA: Code = Code::new("E029");
    pub const NO_PROGRESS: Code = Code::new("E030");
}

pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E041");
    pub const MISSING_CLOSE_PAREN: Code = Code::new("E042");
    pub const UNKNOWN_HEAD_SYMBOL: Code = Code::new("E043");
    pub const EMPTY_LIST: Code = Code::new("E044");
    pub const UNSUPPORTED_DIALECT: Code = Code::new("E045");
    pub const TOO_MANY_CHILDREN: Code = Code::new("E046");
    pub const INVALID_NUMBER: Code = Code::new("E047");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E048");
}

pub mod emission {
    use super::Code;

    pub const UNHANDLED_NODE: Code = Code::new("E060");
    pub const STATEMENT_IN_EXPRESSION: Code = Code::new("E061");
    pub const MAX_EMIT_DEPTH: Code = Code::new("E062");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const DIALECT_SWITCHED: Code = Code::new("I021");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I040");
    pub const EMISSION_COMPLETE: Code = Code::new("I060");
    pub const COMPILATION_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

type M = ErrorMetadata;

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    M::fatal(
        "ERR001",
        "System",
        Severity::Critical,
        "Critical internal compiler error",
        "File a bug report with the source that triggered it",
    ),
    M::fatal(
        "ERR002",
        "System",
        Severity::Critical,
        "Logging or runtime initialization failure",
        "Check the runtime configuration and environment variables",
    ),
    M::fatal(
        "ERR003",
        "System",
        Severity::High,
        "Runtime configuration could not be loaded",
        "Fix the TOML syntax or remove the --config argument",
    ),
    // Loading
    M::rejected(
        "E005",
        Severity::Medium,
        false,
        "Source file not found",
        "Verify the file path exists and is spelled correctly",
    ),
    M::rejected(
        "E006",
        Severity::Low,
        true,
        "Source file does not have the .nih extension",
        "Rename the file or disable require_nih_extension",
    ),
    M::rejected(
        "E007",
        Severity::Medium,
        false,
        "Source file exceeds the maximum size",
        "Split the program or rebuild with a larger max_file_size",
    ),
    M::rejected(
        "E008",
        Severity::Low,
        true,
        "Source file is empty",
        "Add at least one top-level form",
    ),
    M::rejected(
        "E009",
        Severity::Medium,
        false,
        "Permission denied reading source file",
        "Check file permissions",
    ),
    M::rejected(
        "E010",
        Severity::Medium,
        false,
        "Source file is not valid UTF-8",
        "Re-save the file as UTF-8",
    ),
    M::rejected(
        "E011",
        Severity::Medium,
        false,
        "I/O error while reading source file",
        "Check disk and file system health",
    ),
    M::rejected(
        "E012",
        Severity::Medium,
        false,
        "Invalid source path",
        "Pass a path to a regular file",
    ),
    M::rejected(
        "E013",
        Severity::Medium,
        false,
        "Source file has too many lines",
        "Split the program or rebuild with a larger max_line_count",
    ),
    // Lexical
    M::fatal(
        "E020",
        "Lexical",
        Severity::High,
        "Character is not valid in this position",
        "Remove the character or quote it in a string",
    ),
    M::fatal(
        "E021",
        "Lexical",
        Severity::High,
        "String literal is not terminated",
        "Close the string with the same quote that opened it",
    ),
    M::fatal(
        "E022",
        "Lexical",
        Severity::High,
        "Block comment is not terminated",
        "Balance every /* with a matching */",
    ),
    M::fatal(
        "E023",
        "Lexical",
        Severity::Medium,
        "Identifier exceeds the maximum length",
        "Use a shorter name",
    ),
    M::fatal(
        "E024",
        "Lexical",
        Severity::Medium,
        "String literal exceeds the maximum size",
        "Split the string into smaller pieces",
    ),
    M::fatal(
        "E025",
        "Lexical",
        Severity::High,
        "Carriage return found in source",
        "Convert line endings to LF",
    ),
    M::fatal(
        "E026",
        "Lexical",
        Severity::Medium,
        "Comment exceeds the maximum length",
        "Shorten the comment",
    ),
    M::fatal(
        "E027",
        "Lexical",
        Severity::Medium,
        "Source produces too many tokens",
        "Split the program into smaller files",
    ),
    M::fatal(
        "E028",
        "Lexical",
        Severity::Medium,
        "Block comments nested too deeply",
        "Reduce comment nesting",
    ),
    M::fatal(
        "E029",
        "Lexical",
        Severity::High,
        "Unknown pragma",
        "Use #lang = nih-sexpr or #lang = nih-c",
    ),
    M::fatal(
        "E030",
        "Lexical",
        Severity::Critical,
        "Tokenizer made no progress",
        "File a bug report with the source that triggered it",
    ),
    // Syntax
    M::fatal(
        "E040",
        "Syntax",
        Severity::High,
        "Unexpected token",
        "Check the form against its expected shape",
    ),
    M::fatal(
        "E041",
        "Syntax",
        Severity::High,
        "Unexpected end of input",
        "Complete the unfinished form",
    ),
    M::fatal(
        "E042",
        "Syntax",
        Severity::High,
        "Missing closing parenthesis",
        "Add the missing ')'",
    ),
    M::fatal(
        "E043",
        "Syntax",
        Severity::High,
        "Unknown head symbol",
        "Use one of the language's built-in forms",
    ),
    M::fatal(
        "E044",
        "Syntax",
        Severity::High,
        "Empty list",
        "Remove the '()' or give it a head symbol",
    ),
    M::fatal(
        "E045",
        "Syntax",
        Severity::High,
        "Construct not supported in the default dialect",
        "Add '#lang = nih-sexpr' at the top of the file",
    ),
    M::fatal(
        "E046",
        "Syntax",
        Severity::Medium,
        "List has too many children",
        "Split the form into smaller pieces",
    ),
    M::fatal(
        "E047",
        "Syntax",
        Severity::High,
        "Number literal cannot be represented",
        "Use a smaller literal",
    ),
    M::fatal(
        "E048",
        "Syntax",
        Severity::High,
        "Maximum nesting depth exceeded",
        "Flatten deeply nested forms",
    ),
    // Emission
    M::fatal(
        "E060",
        "Emission",
        Severity::High,
        "Node cannot be emitted in this position",
        "Use plist, param and type only inside their parent form",
    ),
    M::fatal(
        "E061",
        "Emission",
        Severity::High,
        "Statement used where an expression is required",
        "Move the statement into a do block or function body",
    ),
    M::fatal(
        "E062",
        "Emission",
        Severity::High,
        "Maximum emission depth exceeded",
        "Flatten deeply nested forms",
    ),
    // Success
    M::milestone("I004", "System", "Logging system initialized"),
    M::milestone("I006", "FileProcessing", "Source file loaded"),
    M::milestone("I020", "Lexical", "Tokenization completed"),
    M::milestone("I021", "Lexical", "Dialect switched by pragma"),
    M::milestone("I040", "Syntax", "AST construction completed"),
    M::milestone("I060", "Emission", "JavaScript emission completed"),
    M::milestone("I090", "Pipeline", "Compilation completed"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_codes_are_unique() {
        let mut seen = HashSet::new();
        for entry in REGISTRY_ENTRIES {
            assert!(seen.insert(entry.code), "duplicate code {}", entry.code);
        }
    }

    #[test]
    fn test_every_stage_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::CONFIGURATION_ERROR,
            file_processing::FILE_NOT_FOUND,
            file_processing::TOO_MANY_LINES,
            lexical::CARRIAGE_RETURN,
            lexical::NO_PROGRESS,
            lexical::UNKNOWN_PRAGMA,
            syntax::UNKNOWN_HEAD_SYMBOL,
            syntax::MISSING_CLOSE_PAREN,
            syntax::MAX_RECURSION_DEPTH,
            emission::UNHANDLED_NODE,
            emission::STATEMENT_IN_EXPRESSION,
            success::COMPILATION_COMPLETE,
        ];
        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification_fallbacks() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
        assert!(is_recoverable("E999"));
        assert!(!requires_halt("E999"));
    }

    #[test]
    fn test_compile_errors_halt() {
        assert!(requires_halt(lexical::INVALID_CHARACTER.as_str()));
        assert!(requires_halt(syntax::EMPTY_LIST.as_str()));
        assert!(requires_halt(emission::UNHANDLED_NODE.as_str()));
        assert!(!requires_halt(file_processing::EMPTY_FILE.as_str()));
        assert_eq!(get_category(syntax::EMPTY_LIST.as_str()), "Syntax");
    }
}
