//! The central interpreter loop: reads one instruction at `pc`, acts,
//! advances: a fuel-limited execute loop over checkpoint/frame-arena
//! stacks with a generic tracer hook, running PEG machine semantics.

use langpeg_bytecode::{Instruction, Program};
use langpeg_core::{Span, Symbol};

use crate::capture::{CaptureArena, CapturedNode, NodeId, NodeType, OpenCapture, OpenCaptureStack};
use crate::checkpoint::{Checkpoint, CheckpointStack};
use crate::error::RuntimeError;
use crate::frame::FrameArena;
use crate::tracer::{NoopTracer, Tracer};

/// Runtime limits on a single match attempt, so a pathological grammar
/// (or adversarial input) cannot hang the host process.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    exec_fuel: u32,
    recursion_limit: u32,
    checkpoint_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            recursion_limit: 1024,
            checkpoint_limit: 65_536,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Hard cap on the backtrack (`Choice`) stack depth. The stack itself
    /// grows on demand with no cap of its own (`CheckpointStack` is a
    /// plain `Vec`); this is the point past which a pathological grammar
    /// gets `Err(StackOverflow)` instead of an unbounded-memory hang.
    pub fn checkpoint_limit(mut self, limit: u32) -> Self {
        self.checkpoint_limit = limit;
        self
    }
}

/// The VM's observable state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Failed { label: Option<Symbol> },
    Halted,
}

/// The result of a single `run()` to completion: either a match (with the
/// tree rooted at `root`, `None` if nothing was captured at top level) or
/// a failure at the farthest position reached, with its label if the
/// failure arose from an unrecovered `Throw`.
pub enum MatchOutcome {
    Success {
        root: Option<NodeId>,
        /// Byte cursor at `Halt` — how much of the input the grammar
        /// consumed, independent of whether anything was captured.
        consumed: u32,
        arena: CaptureArena,
    },
    Failure {
        ffp: u32,
        label: Option<Symbol>,
        /// Best-effort partial tree: the most recently finished node (if
        /// any survived backtracking), e.g. an `Error` node recovered
        /// before the eventual bottom-out failure.
        root: Option<NodeId>,
        arena: CaptureArena,
    },
}

pub struct Vm<'p> {
    program: &'p Program,
    input: &'p [u8],
    pc: u32,
    cursor: u32,
    frames: FrameArena,
    checkpoints: CheckpointStack,
    open_captures: OpenCaptureStack,
    arena: CaptureArena,
    /// Ids of finished nodes that closed with no enclosing open capture —
    /// the roots a `%{}`/`%Name`-less rule body leaves behind. Truncated
    /// on backtrack alongside `arena`/`open_captures`.
    top_level: Vec<NodeId>,
    ffp: u32,
    ffp_label: Option<Symbol>,
    exec_fuel_remaining: u32,
    limits: FuelLimits,
}

impl<'p> Vm<'p> {
    /// Start a fresh machine at `entry` (a rule's body address). Seeds one
    /// call frame whose `return_pc` is one past the end of `program`'s
    /// code, so the entry rule's closing `Return` runs off the end of the
    /// code array — which `run_with` treats as `Halt` — in place of a
    /// literal `Call entry; Halt` preamble.
    pub fn new(program: &'p Program, input: &'p [u8], entry: u32, limits: FuelLimits) -> Self {
        let mut frames = FrameArena::new();
        frames.push(program.len() as u32);
        Self {
            program,
            input,
            pc: entry,
            cursor: 0,
            frames,
            checkpoints: CheckpointStack::new(),
            open_captures: OpenCaptureStack::new(),
            arena: CaptureArena::new(),
            top_level: Vec::new(),
            ffp: 0,
            ffp_label: None,
            exec_fuel_remaining: limits.exec_fuel,
            limits,
        }
    }

    pub fn run(self) -> Result<MatchOutcome, RuntimeError> {
        self.run_with(&mut NoopTracer)
    }

    pub fn run_with<T: Tracer>(mut self, tracer: &mut T) -> Result<MatchOutcome, RuntimeError> {
        loop {
            if self.exec_fuel_remaining == 0 {
                return Err(RuntimeError::FuelExhausted);
            }
            self.exec_fuel_remaining -= 1;

            // `pc` running off the end of the code array stands in for
            // the literal `Halt` the entry rule's outer `Call; Halt`
            // wrapper would execute (see `Vm::new`).
            let Some(instr) = self.program.instruction(self.pc) else {
                let root = self.finish_root();
                return Ok(MatchOutcome::Success {
                    root,
                    consumed: self.cursor,
                    arena: self.arena,
                });
            };
            tracer.step(self.pc, instr, self.cursor);

            match self.step(instr.clone())? {
                State::Running => continue,
                State::Halted => {
                    let root = self.finish_root();
                    return Ok(MatchOutcome::Success {
                        root,
                        consumed: self.cursor,
                        arena: self.arena,
                    });
                }
                State::Failed { label } => {
                    let root = self.finish_root();
                    return Ok(MatchOutcome::Failure {
                        ffp: self.ffp,
                        label,
                        root,
                        arena: self.arena,
                    });
                }
            }
        }
    }

    /// The node a finished match reports as its root: `None` with nothing
    /// captured, the node itself when exactly one top-level capture
    /// survived backtracking, or a synthesized `Sequence` wrapping all of
    /// them (in source order) when a rule body closes more than one
    /// sibling with no enclosing `%{}`/`%Name` to hang them off of.
    fn finish_root(&mut self) -> Option<NodeId> {
        match self.top_level.len() {
            0 => None,
            1 => Some(self.top_level[0]),
            _ => {
                let children = std::mem::take(&mut self.top_level);
                let first = self.arena.get(children[0]).expect("tracked top-level id is valid");
                let last = self.arena.get(*children.last().unwrap()).expect("tracked top-level id is valid");
                let span = Span::new(first.span.start, last.span.end);
                let child_head = crate::capture::link_siblings(&children, &mut self.arena);
                Some(self.arena.push(CapturedNode {
                    node_type: NodeType::Sequence,
                    name: None,
                    span,
                    child_head,
                    next_sibling: None,
                }))
            }
        }
    }

    fn step(&mut self, instr: Instruction) -> Result<State, RuntimeError> {
        match instr {
            Instruction::Char(b) => {
                if self.input.get(self.cursor as usize) == Some(&b) {
                    self.cursor += 1;
                    self.pc += 1;
                    Ok(State::Running)
                } else {
                    self.fail(None)
                }
            }
            Instruction::Any => {
                if (self.cursor as usize) < self.input.len() {
                    self.cursor += 1;
                    self.pc += 1;
                    Ok(State::Running)
                } else {
                    self.fail(None)
                }
            }
            Instruction::Span(id) => {
                let charset = self
                    .program
                    .charset(id)
                    .expect("compiler emits only valid charset ids");
                match self.input.get(self.cursor as usize) {
                    Some(&b) if charset.contains(b as u32) => {
                        self.cursor += 1;
                        self.pc += 1;
                        Ok(State::Running)
                    }
                    _ => self.fail(None),
                }
            }

            Instruction::Choice(addr) => {
                if self.checkpoints.len() as u32 >= self.limits.checkpoint_limit {
                    return Err(RuntimeError::StackOverflow);
                }
                self.checkpoints.push(Checkpoint {
                    pc: addr,
                    cursor: self.cursor,
                    cap_depth: self.open_captures.len(),
                    arena_mark: self.arena.len(),
                    top_level_mark: self.top_level.len() as u32,
                    frame_index: self.frames.current(),
                });
                self.pc += 1;
                Ok(State::Running)
            }
            Instruction::Commit(addr) => {
                self.checkpoints.pop();
                self.pc = addr;
                Ok(State::Running)
            }
            Instruction::PartialCommit(addr) => {
                let cursor = self.cursor;
                let cap_depth = self.open_captures.len();
                let arena_mark = self.arena.len();
                let top_level_mark = self.top_level.len() as u32;
                let frame_index = self.frames.current();
                match self.checkpoints.top_mut() {
                    Some(top) => {
                        top.cursor = cursor;
                        top.cap_depth = cap_depth;
                        top.arena_mark = arena_mark;
                        top.top_level_mark = top_level_mark;
                        top.frame_index = frame_index;
                    }
                    None => return self.fail(None),
                }
                self.pc = addr;
                Ok(State::Running)
            }
            Instruction::BackCommit(addr) => {
                let Some(cp) = self.checkpoints.pop() else {
                    return self.fail(None);
                };
                self.cursor = cp.cursor;
                self.open_captures.truncate(cp.cap_depth);
                self.arena.truncate(cp.arena_mark);
                self.top_level.truncate(cp.top_level_mark as usize);
                self.pc = addr;
                Ok(State::Running)
            }

            Instruction::Fail => self.fail(None),
            Instruction::FailTwice => {
                self.checkpoints.pop();
                self.fail(None)
            }

            Instruction::Call(addr) => {
                if self.frames.depth() >= self.limits.recursion_limit {
                    return Err(RuntimeError::RecursionLimitExceeded);
                }
                self.frames.push(self.pc + 1);
                self.pc = addr;
                Ok(State::Running)
            }
            Instruction::Return => match self.frames.pop() {
                Some((return_pc, is_recovery)) => {
                    if is_recovery {
                        self.close_recovery_capture();
                    }
                    self.pc = return_pc;
                    Ok(State::Running)
                }
                // Malformed bytecode (Return with no matching Call); the
                // sentinel frame Vm::new seeds means a well-formed program
                // never reaches this arm.
                None => self.fail(None),
            },

            Instruction::Jump(addr) => {
                self.pc = addr;
                Ok(State::Running)
            }
            Instruction::Halt => Ok(State::Halted),

            Instruction::Throw(label) => self.throw(label),

            Instruction::CaptureBegin(kind, name) => {
                let node_type = match kind {
                    langpeg_bytecode::CaptureKind::String => NodeType::String,
                    langpeg_bytecode::CaptureKind::Node => NodeType::Node,
                    langpeg_bytecode::CaptureKind::Sequence => NodeType::Sequence,
                };
                self.open_captures.push(OpenCapture {
                    node_type,
                    name,
                    start_cursor: self.cursor,
                    arena_mark: self.arena.len(),
                });
                self.pc += 1;
                Ok(State::Running)
            }
            Instruction::CaptureEnd => {
                let open = self
                    .open_captures
                    .pop()
                    .expect("compiler balances CaptureBegin/CaptureEnd");
                let children: Vec<NodeId> =
                    (open.arena_mark..self.arena.len()).collect();
                let child_head = crate::capture::link_siblings(&children, &mut self.arena);
                let id = self.arena.push(CapturedNode {
                    node_type: open.node_type,
                    name: open.name,
                    span: Span::new(open.start_cursor, self.cursor),
                    child_head,
                    next_sibling: None,
                });
                if self.open_captures.is_empty() {
                    self.top_level.push(id);
                }
                self.pc += 1;
                Ok(State::Running)
            }
        }
    }

    /// Labeled-failure dispatch: if the grammar defines a
    /// rule named by `label`, recover into it via a synthetic call frame
    /// that resumes the parent on `Return`, and emit an `Error` capture
    /// spanning the throw point to wherever recovery left the cursor. If
    /// no such rule exists, behave like `Fail` with the label attached to
    /// the farthest failure position.
    fn throw(&mut self, label: Symbol) -> Result<State, RuntimeError> {
        match self.program.entry_addr(label) {
            Some(addr) => {
                self.open_captures.push(OpenCapture {
                    node_type: NodeType::Error,
                    name: Some(label),
                    start_cursor: self.cursor,
                    arena_mark: self.arena.len(),
                });
                self.frames.push_recovery(self.pc + 1);
                self.pc = addr;
                Ok(State::Running)
            }
            None => self.fail(Some(label)),
        }
    }

    /// Close the `Error` capture a `Throw` opened, once its recovery rule
    /// has returned. A throw is never undone by backtracking once this
    /// commits the node to the arena — though the node is still anchored
    /// on the open-capture/checkpoint discipline, so an enclosing frame
    /// discarded later still discards it with it.
    fn close_recovery_capture(&mut self) {
        let open = self
            .open_captures
            .pop()
            .expect("Throw always pairs its open Error capture with this Return");
        let children: Vec<NodeId> = (open.arena_mark..self.arena.len()).collect();
        let child_head = crate::capture::link_siblings(&children, &mut self.arena);
        let id = self.arena.push(CapturedNode {
            node_type: open.node_type,
            name: open.name,
            span: Span::new(open.start_cursor, self.cursor),
            child_head,
            next_sibling: None,
        });
        if self.open_captures.is_empty() {
            self.top_level.push(id);
        }
    }

    fn fail(&mut self, label: Option<Symbol>) -> Result<State, RuntimeError> {
        self.ffp = self.ffp.max(self.cursor);
        if label.is_some() {
            self.ffp_label = label;
        }

        let Some(cp) = self.checkpoints.pop() else {
            return Ok(State::Failed {
                label: self.ffp_label,
            });
        };

        self.cursor = cp.cursor;
        self.open_captures.truncate(cp.cap_depth);
        self.arena.truncate(cp.arena_mark);
        self.top_level.truncate(cp.top_level_mark as usize);
        self.frames.restore(cp.frame_index);
        self.frames.prune(self.checkpoints.max_frame_ref());
        self.pc = cp.pc;
        Ok(State::Running)
    }
}
