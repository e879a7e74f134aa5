//! Per-stage error enums, one `thiserror` enum per pipeline stage, plus a
//! crate-level `CompileError` that aggregates them.

use langpeg_core::Span;

/// Grammar text failed to parse.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("malformed character class at {span:?}: {reason}")]
    MalformedCharClass { span: Span, reason: String },
    #[error("unterminated literal at {span:?}")]
    UnterminatedLiteral { span: Span },
    #[error("expected `<-` after rule name at {span:?}")]
    MissingArrow { span: Span },
    #[error("unexpected token at {span:?}: {found}")]
    UnexpectedToken { span: Span, found: String },
    #[error("trailing garbage after grammar at {span:?}")]
    TrailingGarbage { span: Span },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
}

/// `@import` resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("import cycle detected: {path}")]
    ImportCycle { path: String },
    #[error("import of `{name}` from `{path}` does not resolve to a defined rule")]
    UnresolvedImport { name: String, path: String },
    #[error("failed to load `{path}`: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Semantic-pass failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SemanticError {
    #[error("reference to undefined rule `{name}` at {span:?}")]
    UndefinedRule { name: String, span: Span },
    #[error("left recursion detected in rule `{rule}`")]
    LeftRecursion { rule: String },
    #[error("label `{label}` is thrown but no rule named `{label}` is defined")]
    MissingRecovery { label: String },
}

/// Aggregates every stage's error into one type `compile()` can return.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error("unknown configuration option `{name}`")]
    UnknownConfigOption { name: String },
}
