use crate::grammar::ast::Node;
use crate::lexical::LexicalMetrics;
use crate::pipeline::error::{Diagnostic, PipelineError};
use crate::pipeline::result::PipelineResult;
use serde::Serialize;

/// Machine-readable summary of one compile, printed by `nihc --json`
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub filename: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<LexicalMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
    pub duration_ms: f64,
    pub timestamp: String,
}

impl PipelineOutput {
    pub fn from_result(result: &PipelineResult, include_ast: bool) -> Self {
        Self {
            filename: result.filename.clone(),
            success: true,
            code: Some(result.code.clone()),
            ast: include_ast.then(|| result.ast.clone()),
            metrics: Some(result.lexical_metrics.clone()),
            diagnostic: None,
            duration_ms: result.processing_duration.as_secs_f64() * 1000.0,
            timestamp: result.completed_at.to_rfc3339(),
        }
    }

    pub fn from_error(filename: &str, error: &PipelineError) -> Self {
        Self {
            filename: filename.to_string(),
            success: false,
            code: None,
            ast: None,
            metrics: None,
            diagnostic: error.diagnostic().cloned(),
            duration_ms: 0.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
