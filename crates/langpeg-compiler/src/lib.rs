//! Grammar text in, `langpeg_bytecode::Program` out: parse → resolve
//! `@import`s → run the semantic pass → compile to bytecode.
//!
//! The two entry points differ only in whether imports are possible:
//! `compile_str` has no file on disk to resolve a relative `@import`
//! path against, so it skips the resolver; `compile_file` reads the
//! grammar off disk first and runs the full pipeline.

pub mod compile;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod semantic;

#[cfg(test)]
#[path = "scenarios_tests.rs"]
mod scenarios_tests;

use std::path::Path;

pub use config::Config;
pub use error::{CompileError, ImportError, ParseError, SemanticError};
pub use langpeg_bytecode::Program;
pub use langpeg_core::Interner;

/// Compile grammar source held only in memory — no `@import` resolution,
/// since there is no file path to resolve a relative import against.
pub fn compile_str(source: &str, config: &Config) -> Result<Program, CompileError> {
    let mut strings = Interner::new();
    let mut grammar = parser::parse(source, &mut strings)?;
    semantic::run(&mut grammar, &mut strings, config)?;
    Ok(compile::compile_grammar(&grammar, strings, config))
}

/// Compile a grammar file, resolving any `@import` directives relative
/// to its directory before running the semantic pass and compiling.
pub fn compile_file(path: &Path, config: &Config) -> Result<Program, CompileError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        CompileError::Import(ImportError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    })?;
    let mut strings = Interner::new();
    let mut grammar = parser::parse(&source, &mut strings)?;
    resolver::resolve_imports(&mut grammar, path, &mut strings)?;
    semantic::run(&mut grammar, &mut strings, config)?;
    Ok(compile::compile_grammar(&grammar, strings, config))
}
