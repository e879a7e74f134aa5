//! `langpeg exec`: compile a grammar, match input against it, and print
//! the capture tree plus the consumed-byte count.

use langpeg_compiler::Config;
use langpeg_vm::Matcher;

use crate::cli::ExecParams;
use crate::util::{self, EXIT_GRAMMAR_ERROR, EXIT_SUCCESS, EXIT_USAGE, render_compile_error};

pub fn run(params: ExecParams) -> i32 {
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

    let mut config = Config::default();
    config.captures = !params.disable_captures;
    config.capture_spaces = !params.disable_capture_spaces;

    let program = match langpeg_compiler::compile_file(&params.grammar, &config) {
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
            Some(sym) => sym,
            None => {
                eprintln!("error: no rule named `{name}` in {}", params.grammar.display());
                return EXIT_USAGE;
            }
        },
        None => match program.entries().keys().next() {
            Some(sym) => *sym,
            None => {
                eprintln!("error: grammar defines no rules");
                return EXIT_USAGE;
            }
        },
    };

    let strings = program.strings().clone();
    let matcher = Matcher::new(program);
    let result = match matcher.exec_entry(&input, entry) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_GRAMMAR_ERROR;
        }
    };

    if let Some(tree) = &result.tree {
        print!("{}", tree.pretty(&strings));
    }
    println!("consumed: {}", result.consumed);
    match &result.error {
        Some(failure) => {
            let label = failure
                .label
                .map(|s| strings.resolve(s).to_string())
                .unwrap_or_else(|| "<none>".to_string());
            println!("error: match failed at byte {} (label: {label})", failure.ffp);
            EXIT_GRAMMAR_ERROR
        }
        None => EXIT_SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ColorChoice;
    use std::path::PathBuf;

    fn write_grammar(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_scenario_consumes_the_whole_input() {
        let dir = tempfile::tempdir().unwrap();
        let grammar = write_grammar(
            &dir,
            "csv.peg",
            "File <- Line (EOL Line)* EOF\n\
             Line <- Field (',' Field)*\n\
             Field <- [^,\\n]*\n\
             EOL <- '\\r'? '\\n'\n\
             EOF <- !.\n",
        );
        let params = ExecParams {
            grammar,
            entry: Some("File".to_string()),
            input_text: Some("a,b\nc,d".to_string()),
            input_file: None,
            disable_captures: false,
            disable_capture_spaces: false,
            color: ColorChoice::Never,
        };
        assert_eq!(run(params), EXIT_SUCCESS);
    }

    #[test]
    fn unknown_entry_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let grammar = write_grammar(&dir, "g.peg", "S <- 'a'\n");
        let params = ExecParams {
            grammar,
            entry: Some("Nope".to_string()),
            input_text: Some("a".to_string()),
            input_file: None,
            disable_captures: false,
            disable_capture_spaces: false,
            color: ColorChoice::Never,
        };
        assert_eq!(run(params), EXIT_USAGE);
    }

    #[test]
    fn ordered_choice_reports_unconsumed_tail_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let grammar = write_grammar(&dir, "g.peg", "S <- ('a' / 'ab') !.\n");
        let params = ExecParams {
            grammar,
            entry: None,
            input_text: Some("ab".to_string()),
            input_file: None,
            disable_captures: false,
            disable_capture_spaces: false,
            color: ColorChoice::Never,
        };
        assert_eq!(run(params), EXIT_GRAMMAR_ERROR);
    }
}
