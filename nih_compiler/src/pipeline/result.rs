use crate::codegen::EmitMetrics;
use crate::file_processor::FileMetadata;
use crate::grammar::ast::Node;
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use crate::tokens::SpannedToken;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Everything one successful compile produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub filename: String,
    pub tokens: Vec<SpannedToken>,
    pub ast: Node,
    pub code: String,
    pub file_metadata: Option<FileMetadata>,
    pub lexical_metrics: LexicalMetrics,
    pub emit_metrics: EmitMetrics,
    pub processing_duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl PipelineResult {
    /// Tokens produced, end-of-stream marker excluded
    pub fn token_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| !token.value.is_eof())
            .count()
    }

    pub fn form_count(&self) -> usize {
        self.ast.children().len()
    }

    pub fn with_file_metadata(mut self, metadata: FileMetadata) -> Self {
        self.file_metadata = Some(metadata);
        self
    }

    pub fn log_success(&self) {
        let seconds = self.processing_duration.as_secs_f64();
        let tokens_per_sec = if seconds > 0.0 {
            self.token_count() as f64 / seconds
        } else {
            0.0
        };

        crate::log_performance!(codes::success::COMPILATION_COMPLETE, "Compilation succeeded",
            duration = self.processing_duration,
            "file" => self.filename,
            "tokens" => self.token_count(),
            "forms" => self.form_count(),
            "code_bytes" => self.code.len(),
            "tokens_per_sec" => format!("{:.0}", tokens_per_sec),
            "completed_at" => self.completed_at.to_rfc3339()
        );
    }
}
