//! `langpeg trace`: like `exec`, but prints every VM instruction executed
//! — a debugging aid for grammars that aren't matching the way expected.

use langpeg_compiler::Config;
use langpeg_vm::Matcher;

use crate::cli::TraceParams;
use crate::util::{self, EXIT_GRAMMAR_ERROR, EXIT_SUCCESS, EXIT_USAGE, render_compile_error};

pub fn run(params: TraceParams) -> i32 {
    let source = match util::read_grammar(&params.grammar) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };
    let input = match util::read_input(params.input_text.as_deref(), params.input_file.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let program = match langpeg_compiler::compile_file(&params.grammar, &Config::default()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!(
                "{}",
                render_compile_error(&e, &source, &params.grammar, params.color)
            );
            return EXIT_GRAMMAR_ERROR;
        }
    };

    let entry = match params.entry.as_deref() {
        Some(name) => match util::find_entry(&program, name) {
            Some(sym) => Some(sym),
            None => {
                eprintln!("error: no rule named `{name}` in {}", params.grammar.display());
                return EXIT_USAGE;
            }
        },
        None => None,
    };

    let matcher = Matcher::new(program);
    let traced = match entry {
        Some(sym) => matcher.exec_entry_traced(&input, sym),
        None => matcher.exec_traced(&input),
    };
    match traced {
        Ok((result, lines)) => {
            for line in lines {
                println!("{line}");
            }
            println!("consumed: {}", result.consumed);
            if result.error.is_some() {
                EXIT_GRAMMAR_ERROR
            } else {
                EXIT_SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            EXIT_GRAMMAR_ERROR
        }
    }
}
