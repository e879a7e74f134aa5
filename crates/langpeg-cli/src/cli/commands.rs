//! Command builders for the CLI, one function per subcommand, composed
//! from the shared arg builders in `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("langpeg")
        .about("Parser generator and parsing VM for a labeled-recovery, capturing PEG dialect")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(ast_command())
        .subcommand(check_command())
        .subcommand(dump_command())
        .subcommand(exec_command())
        .subcommand(trace_command())
}

/// Parse the grammar and print its AST.
pub fn ast_command() -> Command {
    Command::new("ast")
        .about("Parse a grammar and print its AST")
        .after_help(
            r#"EXAMPLES:
  langpeg ast --grammar csv.peg
  langpeg ast --grammar csv.peg --ast-only"#,
        )
        .arg(grammar_arg())
        .arg(ast_only_arg())
        .arg(color_arg())
}

/// Run the full pipeline (imports, semantic pass, compile) and report
/// diagnostics without executing a match.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a grammar: resolve imports, run the semantic pass, compile")
        .after_help(
            r#"EXAMPLES:
  langpeg check --grammar csv.peg"#,
        )
        .arg(grammar_arg())
        .arg(color_arg())
}

/// Compile and print the disassembled bytecode.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Compile a grammar and print its disassembled bytecode")
        .after_help(
            r#"EXAMPLES:
  langpeg dump --grammar csv.peg
  langpeg dump --grammar csv.peg --optimize 0"#,
        )
        .arg(grammar_arg())
        .arg(optimize_arg())
        .arg(color_arg())
}

/// Compile and match input, printing the capture tree.
pub fn exec_command() -> Command {
    Command::new("exec")
        .about("Compile a grammar, match input against it, and print the capture tree")
        .after_help(
            r#"EXAMPLES:
  langpeg exec --grammar csv.peg --entry File --input "a,b\nc,d"
  langpeg exec --grammar csv.peg --entry File --input-file data.csv"#,
        )
        .arg(grammar_arg())
        .arg(entry_arg())
        .arg(input_text_arg())
        .arg(input_file_arg())
        .arg(disable_captures_arg())
        .arg(disable_capture_spaces_arg())
        .arg(color_arg())
}

/// Like `exec`, but prints every VM instruction executed.
pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Compile a grammar, match input against it, and print every instruction executed")
        .after_help(
            r#"EXAMPLES:
  langpeg trace --grammar csv.peg --entry File --input "a,b""#,
        )
        .arg(grammar_arg())
        .arg(entry_arg())
        .arg(input_text_arg())
        .arg(input_file_arg())
        .arg(color_arg())
}
