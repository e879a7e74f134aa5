//! The compiled, immutable program a VM executes.
//!
//! langpeg has no on-disk bytecode format: a `Program` is a plain
//! in-memory struct built directly by the compiler, not a deserialized
//! blob with a header and section table.

use indexmap::IndexMap;

use langpeg_core::{CharSet, Interner, Symbol};

use crate::instruction::{Addr, Instruction};

/// A compiled grammar, ready for a VM to execute against any input.
///
/// Immutable once built; `compile()` in `langpeg-compiler` is the only
/// producer. Cheap to share: a single `Program` may be matched
/// concurrently against different inputs by distinct VM instances.
#[derive(Clone, Debug)]
pub struct Program {
    code: Vec<Instruction>,
    strings: Interner,
    charsets: Vec<CharSet>,
    /// Rule name -> entry address, for `Call` resolution and external
    /// lookup (e.g. the CLI's `--entry` flag).
    entries: IndexMap<Symbol, Addr>,
}

impl Program {
    pub fn new(
        code: Vec<Instruction>,
        strings: Interner,
        charsets: Vec<CharSet>,
        entries: IndexMap<Symbol, Addr>,
    ) -> Self {
        Self {
            code,
            strings,
            charsets,
            entries,
        }
    }

    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    pub fn instruction(&self, pc: Addr) -> Option<&Instruction> {
        self.code.get(pc as usize)
    }

    pub fn strings(&self) -> &Interner {
        &self.strings
    }

    pub fn charset(&self, id: u32) -> Option<&CharSet> {
        self.charsets.get(id as usize)
    }

    pub fn entries(&self) -> &IndexMap<Symbol, Addr> {
        &self.entries
    }

    pub fn entry_addr(&self, name: Symbol) -> Option<Addr> {
        self.entries.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
