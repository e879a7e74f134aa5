//! Instruction set and in-memory program representation for langpeg.
//!
//! This crate defines the bytecode a `langpeg-compiler` `compile()` call
//! produces and a `langpeg-vm` `Matcher` executes: the `Instruction` enum,
//! the `Program` that holds a compiled grammar's code alongside its string
//! table and character-set table, and a disassembler for debugging.

pub mod dump;
pub mod instruction;
pub mod program;

pub use dump::dump;
pub use instruction::{Addr, CaptureKind, CharsetId, Instruction};
pub use program::Program;
