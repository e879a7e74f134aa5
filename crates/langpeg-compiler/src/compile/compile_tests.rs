use langpeg_bytecode::Instruction;
use langpeg_core::Interner;

use super::compile_grammar;
use crate::config::Config;
use crate::parser::parse;

/// Parses and compiles `source`, returning the program plus an interner
/// that shares `Symbol` indices with the one baked into the program (a
/// clone taken right before compilation consumes it) so tests can look
/// up entry addresses by name via `strings.intern(name)`.
fn compile(source: &str, config: &Config) -> (langpeg_bytecode::Program, Interner) {
    let mut strings = Interner::new();
    let grammar = parse(source, &mut strings).unwrap();
    let program = compile_grammar(&grammar, strings.clone(), config);
    (program, strings)
}

#[test]
fn literal_compiles_to_one_char_per_byte() {
    let (program, mut strings) = compile("S <- 'ab'", &Config::default());
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert_eq!(program.instruction(addr), Some(&Instruction::Char(b'a')));
    assert_eq!(program.instruction(addr + 1), Some(&Instruction::Char(b'b')));
    assert_eq!(program.instruction(addr + 2), Some(&Instruction::Return));
}

#[test]
fn class_compiles_to_span() {
    let (program, mut strings) = compile("S <- [0-9]", &Config::default());
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert!(matches!(program.instruction(addr), Some(Instruction::Span(_))));
}

#[test]
fn choice_emits_choice_commit_pair() {
    let mut config = Config::default();
    config.optimize = 0;
    let (program, mut strings) = compile("S <- 'a' / Foo\nFoo <- 'z'", &config);
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert!(matches!(program.instruction(addr), Some(Instruction::Choice(_))));
}

#[test]
fn optimize_merges_single_byte_choice_into_one_span() {
    let mut config = Config::default();
    config.optimize = 1;
    let (program, mut strings) = compile("S <- 'a' / 'b'", &config);
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert!(matches!(program.instruction(addr), Some(Instruction::Span(_))));
    assert_eq!(program.instruction(addr + 1), Some(&Instruction::Return));
}

#[test]
fn star_emits_partial_commit_loop() {
    let (program, mut strings) = compile("S <- 'a'*", &Config::default());
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert!(matches!(program.instruction(addr), Some(Instruction::Choice(_))));
    assert!(matches!(program.instruction(addr + 2), Some(Instruction::PartialCommit(_))));
}

#[test]
fn ref_patches_to_the_target_rules_entry_address() {
    let (program, mut strings) = compile("S <- Foo\nFoo <- 'z'", &Config::default());
    let s = strings.intern("S");
    let foo = strings.intern("Foo");
    let s_addr = program.entry_addr(s).unwrap();
    let foo_addr = program.entry_addr(foo).unwrap();
    assert_eq!(program.instruction(s_addr), Some(&Instruction::Call(foo_addr)));
}

#[test]
fn labeled_throw_compiles_to_choice_commit_throw() {
    let (program, mut strings) = compile("S <- 'a'^oops\noops <-", &Config::default());
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert!(matches!(program.instruction(addr), Some(Instruction::Choice(_))));
}

#[test]
fn capture_wraps_body_in_begin_end_when_enabled() {
    let (program, mut strings) = compile("S <- %{ 'a' }", &Config::default());
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert!(matches!(program.instruction(addr), Some(Instruction::CaptureBegin(_, _))));
}

#[test]
fn disabling_captures_emits_plain_body() {
    let mut config = Config::default();
    config.captures = false;
    let (program, mut strings) = compile("S <- %{ 'a' }", &config);
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    assert_eq!(program.instruction(addr), Some(&Instruction::Char(b'a')));
}

#[test]
fn charset_deduplication_reuses_the_same_table_entry() {
    let (program, mut strings) = compile("S <- [0-9] [0-9]", &Config::default());
    let s = strings.intern("S");
    let addr = program.entry_addr(s).unwrap();
    let Some(Instruction::Span(id0)) = program.instruction(addr) else {
        panic!("expected Span");
    };
    let Some(Instruction::Span(id1)) = program.instruction(addr + 1) else {
        panic!("expected Span");
    };
    assert_eq!(id0, id1);
}
