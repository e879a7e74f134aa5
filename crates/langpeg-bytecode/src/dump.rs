//! Human-readable bytecode disassembly, used by the CLI's `dump`/`trace`
//! subcommands and by the `insta` snapshot tests: one line per
//! instruction, a prefix of resolved names/labels, then the operands.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::instruction::Instruction;
use crate::program::Program;

/// Render every instruction in `program` as one line, annotated with rule
/// labels at entry addresses and the human-readable form of `Throw`/
/// `CaptureBegin` operands.
pub fn dump(program: &Program) -> String {
    let labels: BTreeMap<u32, &str> = program
        .entries()
        .iter()
        .map(|(name, addr)| (*addr, program.strings().resolve(*name)))
        .collect();

    let width = program.len().to_string().len();
    let mut out = String::new();
    for (pc, instr) in program.code().iter().enumerate() {
        if let Some(label) = labels.get(&(pc as u32)) {
            let _ = writeln!(out, "{label}:");
        }
        let _ = writeln!(out, "{pc:>width$}  {}", format_instruction(program, instr));
    }
    out
}

fn format_instruction(program: &Program, instr: &Instruction) -> String {
    match instr {
        Instruction::Char(b) => format!("Char {}", format_byte(*b)),
        Instruction::Any => "Any".to_string(),
        Instruction::Span(id) => format!("Span #{id}"),
        Instruction::Choice(addr) => format!("Choice {addr}"),
        Instruction::Commit(addr) => format!("Commit {addr}"),
        Instruction::PartialCommit(addr) => format!("PartialCommit {addr}"),
        Instruction::BackCommit(addr) => format!("BackCommit {addr}"),
        Instruction::Fail => "Fail".to_string(),
        Instruction::FailTwice => "FailTwice".to_string(),
        Instruction::Call(addr) => format!("Call {addr}"),
        Instruction::Return => "Return".to_string(),
        Instruction::Jump(addr) => format!("Jump {addr}"),
        Instruction::Halt => "Halt".to_string(),
        Instruction::Throw(label) => format!("Throw {}", program.strings().resolve(*label)),
        Instruction::CaptureBegin(kind, name) => {
            let name = name
                .map(|s| program.strings().resolve(s).to_string())
                .unwrap_or_else(|| "_".to_string());
            format!("CaptureBegin {kind:?} {name}")
        }
        Instruction::CaptureEnd => "CaptureEnd".to_string(),
    }
}

fn format_byte(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        format!("'{}'", b as char)
    } else {
        format!("0x{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use langpeg_core::Interner;

    #[test]
    fn dump_labels_entry_addresses() {
        let mut strings = Interner::new();
        let rule = strings.intern("digit");
        let program = Program::new(
            vec![Instruction::Char(b'0'), Instruction::Return],
            strings,
            vec![],
            IndexMap::from([(rule, 0)]),
        );
        let text = dump(&program);
        assert!(text.starts_with("digit:\n"));
        assert!(text.contains("Char '0'"));
    }

    #[test]
    fn dump_formats_non_printable_bytes_as_hex() {
        let program = Program::new(
            vec![Instruction::Char(0x01), Instruction::Return],
            Interner::new(),
            vec![],
            IndexMap::new(),
        );
        let text = dump(&program);
        assert!(text.contains("0x01"));
    }
}
