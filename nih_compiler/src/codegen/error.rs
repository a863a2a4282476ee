use crate::grammar::ast::Tag;
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type EmitResult<T> = Result<T, EmitError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmitError {
    #[error("Unhandled node '{tag}' outside its enclosing form")]
    UnhandledNode { tag: Tag, span: Span },

    #[error("'{tag}' is a statement and cannot be used as a value")]
    StatementInExpression { tag: Tag, span: Span },

    #[error("Maximum emission depth {depth} exceeded")]
    MaxEmitDepth { depth: usize, span: Span },
}

impl EmitError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnhandledNode { .. } => codes::emission::UNHANDLED_NODE,
            Self::StatementInExpression { .. } => codes::emission::STATEMENT_IN_EXPRESSION,
            Self::MaxEmitDepth { .. } => codes::emission::MAX_EMIT_DEPTH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnhandledNode { span, .. }
            | Self::StatementInExpression { span, .. }
            | Self::MaxEmitDepth { span, .. } => *span,
        }
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn help(&self) -> Option<String> {
        match self {
            Self::UnhandledNode { tag, .. } => Some(format!(
                "'{}' is only valid inside {}",
                tag,
                match tag {
                    Tag::Param => "(plist ...)",
                    Tag::PList => "(fn ...)",
                    Tag::Type => "(cast ...)",
                    _ => "its parent form",
                }
            )),
            Self::StatementInExpression { .. } => {
                Some("move the statement into a (do ...) block or a function body".to_string())
            }
            Self::MaxEmitDepth { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let error = EmitError::UnhandledNode {
            tag: Tag::Param,
            span: Span::dummy(),
        };
        assert_eq!(error.error_code().as_str(), "E060");
        assert!(error.to_string().contains("'param'"));
        assert!(error.help().is_some_and(|h| h.contains("plist")));

        let error = EmitError::StatementInExpression {
            tag: Tag::Let,
            span: Span::dummy(),
        };
        assert_eq!(error.error_code(), codes::emission::STATEMENT_IN_EXPRESSION);
        assert_eq!(error.span(), Span::dummy());
    }
}
