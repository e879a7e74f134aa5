//! `langpeg dump`: compile a grammar and print its disassembled bytecode.

use langpeg_compiler::Config;

use crate::cli::DumpParams;
use crate::util::{self, EXIT_GRAMMAR_ERROR, EXIT_SUCCESS, EXIT_USAGE, render_compile_error};

pub fn run(params: DumpParams) -> i32 {
    let source = match util::read_grammar(&params.grammar) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let mut config = Config::default();
    config.optimize = params.optimize.min(2);

    match langpeg_compiler::compile_file(&params.grammar, &config) {
        Ok(program) => {
            print!("{}", langpeg_bytecode::dump(&program));
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}",
                render_compile_error(&e, &source, &params.grammar, params.color)
            );
            EXIT_GRAMMAR_ERROR
        }
    }
}
