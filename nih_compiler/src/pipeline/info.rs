use crate::config::build_info;
use crate::config::compile_time::{file_processing, lexical, syntax};
use crate::file_processor::NIH_EXTENSION;
use crate::grammar::langdef;
use crate::syntax::recipes;

/// Static description of the compiler build
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub target: &'static str,
    pub max_file_size: u64,
    pub max_token_count: usize,
    pub max_parse_depth: usize,
    pub supported_extensions: Vec<String>,
    pub head_symbols: usize,
    pub keywords: usize,
    pub operators: usize,
    pub limits_source: String,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "NIH Compiler Pipeline:\n\
             - Stages: {}\n\
             - Target: {}\n\
             - Max File Size: {} MB\n\
             - Max Tokens: {}\n\
             - Max Parse Depth: {}\n\
             - Supported Extensions: {}\n\
             - Head Symbols: {}\n\
             - Keywords: {}\n\
             - Operators: {}\n\
             - Limits: {}",
            self.stages.join(" -> "),
            self.target,
            self.max_file_size / (1024 * 1024),
            self.max_token_count,
            self.max_parse_depth,
            self.supported_extensions.join(", "),
            self.head_symbols,
            self.keywords,
            self.operators,
            self.limits_source
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage NIH compiler targeting {}",
            self.stages.len(),
            self.target
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: vec!["file", "lexical", "syntax", "emission"],
        target: "JavaScript",
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_token_count: lexical::MAX_TOKEN_COUNT,
        max_parse_depth: syntax::MAX_PARSE_DEPTH,
        supported_extensions: vec![NIH_EXTENSION.to_string()],
        head_symbols: recipes::HEAD_RECIPES.len(),
        keywords: langdef::KEYWORDS.len(),
        operators: langdef::OPERATORS.len(),
        limits_source: build_info::source_info(),
    }
}
