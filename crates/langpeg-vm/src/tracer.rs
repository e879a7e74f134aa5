//! Execution tracing hook for the CLI's `trace` subcommand: a generic
//! trait so release builds pay nothing for tracing (`NoopTracer`'s calls
//! are inlined away) while the CLI's `PrintTracer` collects a
//! step-by-step log on request.

use langpeg_bytecode::Instruction;

pub trait Tracer {
    fn step(&mut self, pc: u32, instr: &Instruction, cursor: u32);
}

/// Tracer that does nothing; the default for `Matcher::exec`.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn step(&mut self, _pc: u32, _instr: &Instruction, _cursor: u32) {}
}

/// Collects one formatted line per instruction executed.
#[derive(Default)]
pub struct LogTracer {
    pub lines: Vec<String>,
}

impl Tracer for LogTracer {
    fn step(&mut self, pc: u32, instr: &Instruction, cursor: u32) {
        self.lines.push(format!("{pc:>6}  cursor={cursor:<6} {instr:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_tracer_records_one_line_per_step() {
        let mut tracer = LogTracer::default();
        tracer.step(0, &Instruction::Any, 0);
        tracer.step(1, &Instruction::Return, 1);
        assert_eq!(tracer.lines.len(), 2);
        assert!(tracer.lines[0].contains("Any"));
    }
}
