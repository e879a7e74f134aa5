//! `langpeg check`: run the full pipeline and report diagnostics without
//! executing a match.

use langpeg_compiler::Config;

use crate::cli::CheckParams;
use crate::util::{self, EXIT_GRAMMAR_ERROR, EXIT_SUCCESS, EXIT_USAGE, render_compile_error};

pub fn run(params: CheckParams) -> i32 {
    let source = match util::read_grammar(&params.grammar) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    match langpeg_compiler::compile_file(&params.grammar, &Config::default()) {
        Ok(program) => {
            println!(
                "ok: {} rules, {} instructions",
                program.entries().len(),
                program.len()
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}",
                render_compile_error(&e, &source, &params.grammar, params.color)
            );
            if let Some(note) = util::import_error_note(&e) {
                eprintln!("  note: {note}");
            }
            EXIT_GRAMMAR_ERROR
        }
    }
}
