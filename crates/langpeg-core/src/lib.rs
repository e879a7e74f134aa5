//! Core data structures shared by the langpeg compiler, bytecode, and VM
//! crates: string interning, source spans, character classes, and the
//! grammar AST.
//!
//! This crate has no dependency on any of the other langpeg crates.

pub mod ast;
pub mod charset;
pub mod interner;
pub mod span;

#[cfg(test)]
#[path = "interner_tests.rs"]
mod interner_tests;

pub use ast::{Expr, ExprKind, Grammar, ImportDirective, Rule};
pub use charset::{CharRange, CharSet};
pub use interner::{Interner, Symbol};
pub use span::{LineIndex, LocatedSpan, Location, Span};
