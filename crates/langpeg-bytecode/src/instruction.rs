//! The parsing-machine instruction set: one opcode, 0-2 operands, split
//! as `Opcode`/`Instruction` so the operand set a linear backtracking VM
//! needs stays separate from dispatch.

use langpeg_core::Symbol;

/// An address into a `Program`'s code array.
pub type Addr = u32;

/// A charset-table index (`Program::charsets`).
pub type CharsetId = u32;

/// One instruction. Jump-like operands (`Choice`, `Commit`, `PartialCommit`,
/// `BackCommit`, `Jump`) carry absolute addresses rather than relative
/// offsets: the compiler resolves labels to addresses once during emission,
/// so the VM never has to add a signed offset to `pc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Match a single literal byte, advancing `cursor` by one on success.
    Char(u8),
    /// Match any single byte.
    Any,
    /// Match a single byte against a compiled character class.
    Span(CharsetId),

    /// Push a backtrack frame `{pc = target, cursor, cap_depth}`.
    Choice(Addr),
    /// Pop the top backtrack frame and jump.
    Commit(Addr),
    /// Update the top backtrack frame's `cursor`/`cap_depth` in place, then
    /// jump, without pushing or popping — the `Star` tight loop.
    PartialCommit(Addr),
    /// Pop a backtrack frame, restore `cursor`/`cap_depth` from it, and
    /// jump — used to implement lookahead (`&`).
    BackCommit(Addr),

    /// Trigger backtracking: restore `cursor`/`cap_depth` from the top
    /// backtrack frame and jump to its `pc`; failure at this position if
    /// no frame remains.
    Fail,
    /// Like `Fail`, but used where two consecutive failures are needed
    /// without restoring state in between (`Not`).
    FailTwice,

    /// Push a call frame `{return_pc}` and jump to a rule's entry address.
    Call(Addr),
    /// Pop the nearest call frame and jump to its `return_pc`.
    Return,

    /// Unconditional jump.
    Jump(Addr),
    /// Stop the machine with success.
    Halt,

    /// Raise a labeled failure, dispatching to a recovery rule if the
    /// grammar defines one named by this label.
    Throw(Symbol),

    /// Open a capture: push `{kind, name, start_cursor, arena_mark}`.
    CaptureBegin(CaptureKind, Option<Symbol>),
    /// Close the innermost open capture, appending a finished node to the
    /// arena spanning `[start_cursor, cursor)`.
    CaptureEnd,
}

/// The kind of node a `CaptureBegin` will produce when closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureKind {
    /// Raw-text capture (`%{ … }`): span over the input, no children.
    String,
    /// Named capture over a single sub-match (`%Name`).
    Node,
    /// An unnamed ordered list of children. No grammar surface syntax
    /// emits this directly; the VM synthesizes it to wrap multiple
    /// sibling captures that finish with no enclosing `%{}`/`%Name`.
    Sequence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_equality_ignores_nothing() {
        assert_eq!(Instruction::Char(b'a'), Instruction::Char(b'a'));
        assert_ne!(Instruction::Char(b'a'), Instruction::Char(b'b'));
    }

    #[test]
    fn jump_like_instructions_carry_absolute_addresses() {
        let choice = Instruction::Choice(42);
        match choice {
            Instruction::Choice(addr) => assert_eq!(addr, 42),
            _ => panic!("expected Choice"),
        }
    }
}
