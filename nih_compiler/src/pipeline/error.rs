use crate::codegen::EmitError;
use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::SyntaxError;
use crate::utils::{SourceMap, Span};
use serde::Serialize;
use std::fmt;

/// A rendered compile failure: code, location and source excerpt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub filename: String,
    pub code: String,
    pub message: String,
    pub span: Option<Span>,
    pub help: Option<String>,
    pub rendered: String,
}

impl Diagnostic {
    /// Diagnostic pointing into the source with carets under `span`
    pub fn at_span(
        filename: &str,
        source_map: &SourceMap,
        code: Code,
        message: String,
        span: Span,
        help: Option<String>,
    ) -> Self {
        let mut rendered = source_map.format_error(filename, &span, &message);
        if let Some(help) = &help {
            rendered.push_str(&format!("  = help: {}\n", help));
        }

        Self {
            filename: filename.to_string(),
            code: code.as_str().to_string(),
            message,
            span: Some(span),
            help,
            rendered,
        }
    }

    /// Diagnostic for failures that have no source position
    pub fn without_span(filename: &str, code: Code, message: String) -> Self {
        let rendered = format!("error: {}\n  --> {}\n", message, filename);
        Self {
            filename: filename.to_string(),
            code: code.as_str().to_string(),
            message,
            span: None,
            help: None,
            rendered,
        }
    }

    pub fn line(&self) -> Option<u32> {
        self.span.map(|span| span.start.line)
    }

    pub fn column(&self) -> Option<u32> {
        self.span.map(|span| span.start.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rendered.trim_end())
    }
}

/// One failed stage, with its diagnostic already rendered
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{diagnostic}")]
    FileProcessing {
        #[source]
        error: FileProcessorError,
        diagnostic: Diagnostic,
    },

    #[error("{diagnostic}")]
    LexicalAnalysis {
        #[source]
        error: LexerError,
        diagnostic: Diagnostic,
    },

    #[error("{diagnostic}")]
    SyntaxAnalysis {
        #[source]
        error: SyntaxError,
        diagnostic: Diagnostic,
    },

    #[error("{diagnostic}")]
    Emission {
        #[source]
        error: EmitError,
        diagnostic: Diagnostic,
    },
}

impl PipelineError {
    pub fn file(error: FileProcessorError) -> Self {
        let diagnostic =
            Diagnostic::without_span(error.path(), error.error_code(), error.to_string());
        Self::FileProcessing { error, diagnostic }
    }

    pub fn lexical(error: LexerError, filename: &str, source_map: &SourceMap) -> Self {
        let diagnostic = Diagnostic::at_span(
            filename,
            source_map,
            error.error_code(),
            error.to_string(),
            error.span(),
            error.help(),
        );
        Self::LexicalAnalysis { error, diagnostic }
    }

    pub fn syntax(error: SyntaxError, filename: &str, source_map: &SourceMap) -> Self {
        let diagnostic = Diagnostic::at_span(
            filename,
            source_map,
            error.error_code(),
            error.to_string(),
            error.span(),
            error.help(),
        );
        Self::SyntaxAnalysis { error, diagnostic }
    }

    pub fn emission(error: EmitError, filename: &str, source_map: &SourceMap) -> Self {
        let diagnostic = Diagnostic::at_span(
            filename,
            source_map,
            error.error_code(),
            error.to_string(),
            error.span(),
            error.help(),
        );
        Self::Emission { error, diagnostic }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing { error, .. } => error.error_code(),
            Self::LexicalAnalysis { error, .. } => error.error_code(),
            Self::SyntaxAnalysis { error, .. } => error.error_code(),
            Self::Emission { error, .. } => error.error_code(),
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::FileProcessing { diagnostic, .. }
            | Self::LexicalAnalysis { diagnostic, .. }
            | Self::SyntaxAnalysis { diagnostic, .. }
            | Self::Emission { diagnostic, .. } => Some(diagnostic),
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.diagnostic().and_then(|diagnostic| diagnostic.span)
    }

    /// Stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileProcessing { .. } => "file_processing",
            Self::LexicalAnalysis { .. } => "lexical",
            Self::SyntaxAnalysis { .. } => "syntax",
            Self::Emission { .. } => "emission",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::Position;

    #[test]
    fn test_diagnostic_rendering() {
        let source_map = SourceMap::new("(let W 16)\n(let x\n".to_string());
        let span = Span::new(Position::new(18, 2, 7), Position::new(18, 2, 7));
        let diagnostic = Diagnostic::at_span(
            "demo.nih",
            &source_map,
            codes::syntax::UNEXPECTED_END_OF_INPUT,
            "Unexpected end of input: expected expression".to_string(),
            span,
            Some("check for unbalanced parentheses".to_string()),
        );

        let text = diagnostic.to_string();
        assert!(text.starts_with("error: Unexpected end of input"));
        assert!(text.contains("demo.nih:2:7"));
        assert!(text.contains(" 2 | (let x"));
        assert!(text.contains("^"));
        assert!(text.ends_with("= help: check for unbalanced parentheses"));
        assert_eq!(diagnostic.line(), Some(2));
        assert_eq!(diagnostic.column(), Some(7));
    }

    #[test]
    fn test_file_error_names_path() {
        let error = PipelineError::file(FileProcessorError::FileNotFound {
            path: "nope.nih".to_string(),
        });
        assert_eq!(error.stage(), "file_processing");
        assert_eq!(error.error_code().as_str(), "E005");
        assert!(error.to_string().contains("nope.nih"));
        assert_eq!(error.span(), None);
    }
}
