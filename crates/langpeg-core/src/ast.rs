//! Grammar AST: expressions as tagged variants carrying source spans.

use indexmap::IndexMap;

use crate::interner::Symbol;
use crate::span::Span;

/// One grammar expression node, with the source span it was parsed from.
#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tagged-variant expression.
#[derive(Clone, Debug)]
pub enum ExprKind {
    Empty,
    Any,
    Literal(Vec<u8>),
    Class(crate::charset::CharSet),
    Ref(Symbol),
    Seq(Vec<Expr>),
    Choice(Vec<Expr>),
    Star(Box<Expr>),
    Plus(Box<Expr>),
    Opt(Box<Expr>),
    And(Box<Expr>),
    Not(Box<Expr>),
    Throw(Symbol),
    /// `Expr^label`: suffix-position label on the whole expression.
    Labeled(Box<Expr>, Symbol),
    /// `%Ref` or `%(Expr)`: produce a named capture wrapping the match.
    Capture(Box<Expr>, Option<Symbol>),
    /// `%{ Expr }`: produce a raw-text capture over the matched span.
    CaptureRange(Box<Expr>),
}

/// One rule definition: `Name <- Expr`.
#[derive(Clone, Debug)]
pub struct Rule {
    pub name: Symbol,
    pub span: Span,
    /// Set by the semantic pass; `None` until classified.
    pub syntactic: Option<bool>,
    pub expr: Expr,
}

/// A parsed (and, after resolution, merged) grammar: an ordered mapping
/// from rule name to its definition, plus any `@import` directives the
/// parser recorded (consumed by the resolver and absent from the merged
/// result).
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    pub rules: IndexMap<Symbol, Rule>,
    pub imports: Vec<ImportDirective>,
    /// The first rule defined, used as the default entry point absent an
    /// explicit `--entry` (matches common PEG-tool convention).
    pub entry: Option<Symbol>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: Symbol) -> Option<&Rule> {
        self.rules.get(&name)
    }

    pub fn define(&mut self, rule: Rule) {
        if self.entry.is_none() {
            self.entry = Some(rule.name);
        }
        self.rules.insert(rule.name, rule);
    }
}

/// `@import A, B from "path"`.
#[derive(Clone, Debug)]
pub struct ImportDirective {
    pub names: Vec<Symbol>,
    pub path: String,
    pub span: Span,
}
