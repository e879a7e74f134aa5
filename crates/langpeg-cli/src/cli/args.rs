//! Shared argument builders for CLI commands: one function per flag,
//! composed per-subcommand, so flags that appear on more than one
//! subcommand (`--grammar`, `--color`) stay textually identical.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file to compile (required on every subcommand).
pub fn grammar_arg() -> Arg {
    Arg::new("grammar")
        .long("grammar")
        .value_name("PATH")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Grammar file to compile")
}

/// Entry rule name to match from (`exec`/`trace`).
pub fn entry_arg() -> Arg {
    Arg::new("entry")
        .long("entry")
        .value_name("NAME")
        .help("Entry rule to match from (defaults to the grammar's first rule)")
}

/// Inline input text (`exec`/`trace`).
pub fn input_text_arg() -> Arg {
    Arg::new("input")
        .long("input")
        .value_name("TEXT")
        .help("Input text to match")
}

/// Input from a file, or `-` for stdin (`exec`/`trace`).
pub fn input_file_arg() -> Arg {
    Arg::new("input_file")
        .long("input-file")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("Input file to match (`-` for stdin)")
}

/// Parse only, skip import resolution/semantic pass/compile (`ast`).
pub fn ast_only_arg() -> Arg {
    Arg::new("ast_only")
        .long("ast-only")
        .action(ArgAction::SetTrue)
        .help("Dump the parsed AST and exit, skipping imports/semantics/compile")
}

/// Peephole optimization level (`dump`).
pub fn optimize_arg() -> Arg {
    Arg::new("optimize")
        .long("optimize")
        .value_name("N")
        .default_value("1")
        .value_parser(value_parser!(u8))
        .help("Peephole optimization level (0-2)")
}

/// Disable capture operators entirely (`grammar.captures`).
pub fn disable_captures_arg() -> Arg {
    Arg::new("disable_captures")
        .long("disable-captures")
        .action(ArgAction::SetTrue)
        .help("Treat every `%` capture operator as a no-op")
}

/// Exclude injected whitespace from captures (`grammar.capture_spaces`).
pub fn disable_capture_spaces_arg() -> Arg {
    Arg::new("disable_capture_spaces")
        .long("disable-capture-spaces")
        .action(ArgAction::SetTrue)
        .help("Exclude compiler-injected whitespace from capture spans")
}

/// Colorize diagnostic output (`--color`).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostic output")
}
