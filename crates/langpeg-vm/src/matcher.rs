//! The public entry point: `Matcher` wraps a compiled `Program` and runs
//! it against input bytes.

use langpeg_bytecode::Program;
use langpeg_core::Symbol;

use crate::error::RuntimeError;
use crate::tracer::{LogTracer, Tracer};
use crate::tree::Tree;
use crate::vm::{FuelLimits, MatchOutcome, Vm};

/// The result of `Matcher::exec`: a tree (success or best-effort partial
/// on failure), how many bytes were consumed, and an error if matching
/// did not reach `Halt`.
pub struct MatchResult {
    pub tree: Option<Tree>,
    pub consumed: u32,
    pub error: Option<MatchFailed>,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("match failed at byte {ffp}")]
pub struct MatchFailed {
    pub label: Option<Symbol>,
    pub ffp: u32,
}

pub struct Matcher {
    program: Program,
    limits: FuelLimits,
}

impl Matcher {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            limits: FuelLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Match `input` against the grammar's default entry rule.
    pub fn exec(&self, input: &[u8]) -> Result<MatchResult, RuntimeError> {
        let entry = self.default_entry()?;
        self.exec_entry(input, entry)
    }

    /// Match `input` starting from a specific named rule.
    pub fn exec_entry(&self, input: &[u8], entry: Symbol) -> Result<MatchResult, RuntimeError> {
        let addr = self
            .program
            .entry_addr(entry)
            .expect("caller passed a rule name the program defines");
        self.run(input, addr, &mut crate::tracer::NoopTracer)
    }

    /// Like `exec`, but collects a step-by-step instruction trace (the
    /// CLI's `trace` subcommand).
    pub fn exec_traced(&self, input: &[u8]) -> Result<(MatchResult, Vec<String>), RuntimeError> {
        let entry = self.default_entry()?;
        self.exec_traced_at(input, entry)
    }

    /// Like `exec_entry`, but collects a step-by-step instruction trace.
    pub fn exec_entry_traced(
        &self,
        input: &[u8],
        entry: Symbol,
    ) -> Result<(MatchResult, Vec<String>), RuntimeError> {
        let addr = self
            .program
            .entry_addr(entry)
            .expect("caller passed a rule name the program defines");
        self.exec_traced_at(input, addr)
    }

    fn exec_traced_at(
        &self,
        input: &[u8],
        entry: u32,
    ) -> Result<(MatchResult, Vec<String>), RuntimeError> {
        let mut tracer = LogTracer::default();
        let result = self.run(input, entry, &mut tracer)?;
        Ok((result, tracer.lines))
    }

    fn default_entry(&self) -> Result<u32, RuntimeError> {
        self.program
            .entries()
            .values()
            .next()
            .copied()
            .ok_or(RuntimeError::NoEntryPoint)
    }

    #[tracing::instrument(name = "vm_match", skip(self, input, tracer), fields(input_len = input.len()))]
    fn run<T: Tracer>(
        &self,
        input: &[u8],
        entry: u32,
        tracer: &mut T,
    ) -> Result<MatchResult, RuntimeError> {
        let vm = Vm::new(&self.program, input, entry, self.limits);
        match vm.run_with(tracer)? {
            MatchOutcome::Success {
                root,
                consumed,
                arena,
            } => {
                tracing::debug!(consumed, "match succeeded");
                Ok(MatchResult {
                    tree: Some(Tree::from_parts(arena, input.to_vec(), root)),
                    consumed,
                    error: None,
                })
            }
            MatchOutcome::Failure {
                ffp,
                label,
                root,
                arena,
            } => {
                tracing::debug!(ffp, ?label, "match failed");
                Ok(MatchResult {
                    tree: root.map(|r| Tree::from_parts(arena, input.to_vec(), Some(r))),
                    consumed: 0,
                    error: Some(MatchFailed { label, ffp }),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use langpeg_bytecode::{CaptureKind, Instruction};
    use langpeg_core::Interner;

    fn digit_program() -> Program {
        let mut strings = Interner::new();
        let entry = strings.intern("digit");
        Program::new(
            vec![
                Instruction::CaptureBegin(CaptureKind::String, Some(entry)),
                Instruction::Span(0),
                Instruction::CaptureEnd,
                Instruction::Return,
            ],
            strings,
            vec![langpeg_core::CharSet::from_ranges(vec![
                langpeg_core::CharRange::new(b'0' as u32, b'9' as u32),
            ])],
            IndexMap::from([(entry, 0)]),
        )
    }

    #[test]
    fn matches_a_single_digit() {
        let matcher = Matcher::new(digit_program());
        let result = matcher.exec(b"5").expect("vm does not error");
        assert!(result.error.is_none());
        let tree = result.tree.expect("successful match produces a tree");
        let root = tree.root().expect("one capture was recorded");
        assert_eq!(tree.text(root), b"5");
    }

    #[test]
    fn rejects_a_non_digit() {
        let matcher = Matcher::new(digit_program());
        let result = matcher.exec(b"x").expect("vm does not error");
        assert!(result.error.is_some());
    }
}
