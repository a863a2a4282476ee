//! Compile pipeline: source text -> tokens -> AST -> JavaScript
//!
//! Each stage failure is wrapped with a diagnostic rendered against the
//! source, so `PipelineError`'s `Display` is what a user should see.

mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::{Diagnostic, PipelineError};
pub use info::{get_pipeline_info, PipelineInfo};
pub use output::PipelineOutput;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::codegen::JsEmitter;
use crate::config::RuntimeConfig;
use crate::file_processor::{FileProcessor, FileProcessorError};
use crate::lexical::LexicalAnalyzer;
use crate::logging;
use crate::utils::SourceMap;
use std::path::Path;
use std::time::Instant;

/// Compile source text to JavaScript: the library shim followed by user code
pub fn compile(source: &str, filename: &str) -> Result<String, PipelineError> {
    compile_source(source, filename, &RuntimeConfig::default()).map(|result| result.code)
}

/// Compile source text and keep every intermediate product
pub fn compile_source(
    source: &str,
    filename: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_source_context(filename, || run_stages(source, filename, config))
}

fn run_stages(
    source: &str,
    filename: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let source_map = || SourceMap::new(source.to_string());

    crate::log_info!("Compiling", "file" => filename, "bytes" => source.len());

    let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
    let tokens = analyzer
        .tokenize(source)
        .map_err(|e| PipelineError::lexical(e, filename, &source_map()))?;
    let lexical_metrics = analyzer.metrics().clone();
    let token_list = tokens.tokens().to_vec();

    let ast = crate::syntax::parse_module(tokens)
        .map_err(|e| PipelineError::syntax(e, filename, &source_map()))?;

    let mut emitter = JsEmitter::with_preferences(config.emitter.clone());
    let code = emitter
        .emit_module(&ast)
        .map_err(|e| PipelineError::emission(e, filename, &source_map()))?;

    let result = PipelineResult {
        filename: filename.to_string(),
        tokens: token_list,
        ast,
        code,
        file_metadata: None,
        lexical_metrics,
        emit_metrics: emitter.metrics().clone(),
        processing_duration: start_time.elapsed(),
        completed_at: chrono::Utc::now(),
    };
    result.log_success();

    Ok(result)
}

/// Read a source file as text
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<String, PipelineError> {
    load_source_with_config(path, &RuntimeConfig::default())
}

pub fn load_source_with_config<P: AsRef<Path>>(
    path: P,
    config: &RuntimeConfig,
) -> Result<String, PipelineError> {
    let path_str = path_to_str(path.as_ref())?;
    FileProcessor::from_preferences(&config.file_processor)
        .process_file(path_str)
        .map(|loaded| loaded.source)
        .map_err(PipelineError::file)
}

/// Load and compile one file
pub fn compile_file<P: AsRef<Path>>(path: P) -> Result<PipelineResult, PipelineError> {
    compile_file_with_config(path, &RuntimeConfig::default())
}

pub fn compile_file_with_config<P: AsRef<Path>>(
    path: P,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let path_str = path_to_str(path.as_ref())?;
    let loaded = FileProcessor::from_preferences(&config.file_processor)
        .process_file(path_str)
        .map_err(PipelineError::file)?;

    let result = compile_source(&loaded.source, path_str, config)?;
    Ok(result.with_file_metadata(loaded.metadata))
}

fn path_to_str(path: &Path) -> Result<&str, PipelineError> {
    path.to_str().ok_or_else(|| {
        PipelineError::file(FileProcessorError::InvalidPath {
            path: path.display().to_string(),
        })
    })
}
