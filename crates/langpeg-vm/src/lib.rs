//! Stack-based backtracking VM for executing compiled langpeg grammars.
//!
//! Runs a `langpeg_bytecode::Program` against input bytes, producing a
//! `Tree` of captures (or a best-effort partial tree alongside a
//! `MatchFailed` error).

pub mod capture;
pub mod checkpoint;
pub mod error;
pub mod frame;
pub mod matcher;
pub mod tracer;
pub mod tree;
pub mod vm;


pub use capture::{CaptureArena, CapturedNode, NodeId, NodeType};
pub use error::RuntimeError;
pub use matcher::{MatchFailed, MatchResult, Matcher};
pub use tracer::{LogTracer, NoopTracer, Tracer};
pub use tree::Tree;
pub use vm::{FuelLimits, MatchOutcome, Vm};
