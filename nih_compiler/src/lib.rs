// Internal modules
pub mod codegen;
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export the compile entry points
pub use pipeline::{
    compile, compile_file, compile_file_with_config, compile_source, load_source, Diagnostic,
    PipelineError, PipelineResult,
};

// Re-export pipeline output for tooling consumers
pub use pipeline::output::PipelineOutput;
