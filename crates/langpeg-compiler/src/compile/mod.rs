//! AST → bytecode compiler. One `emit_*` function per `ExprKind` variant,
//! matching the emission table exactly; labels are resolved as absolute
//! addresses in place (no symbolic jump targets), and forward references
//! to rules not yet emitted are recorded and patched once every rule's
//! entry address is known. Peephole passes live in their own submodule
//! (`optimize.rs`) rather than inline in emission.

mod optimize;

use indexmap::IndexMap;

use langpeg_bytecode::{Addr, CaptureKind, CharsetId, Instruction, Program};
use langpeg_core::{CharSet, Expr, ExprKind, Grammar, Interner, Rule, Symbol};

use crate::config::Config;

/// Compile an already-resolved, already-semantically-validated grammar
/// into a `Program`. Assumes `semantic::run` has already injected
/// builtins, classified rules, inserted implicit whitespace, and
/// confirmed every `^label` has a recovery rule — this function does not
/// re-check any of that, and panics (rather than erroring) on a `Ref` to
/// an undefined rule, since that invariant is the semantic pass's job.
pub fn compile_grammar(grammar: &Grammar, strings: Interner, config: &Config) -> Program {
    let mut compiler = Compiler {
        code: Vec::new(),
        charsets: Vec::new(),
        entries: IndexMap::new(),
        pending_calls: Vec::new(),
        config: *config,
    };

    for rule in grammar.rules.values() {
        compiler.emit_rule(rule);
    }
    compiler.patch_calls();

    Program::new(compiler.code, strings, compiler.charsets, compiler.entries)
}

struct Compiler {
    code: Vec<Instruction>,
    charsets: Vec<CharSet>,
    entries: IndexMap<Symbol, Addr>,
    /// `(code index of a placeholder Call, target rule symbol)`, patched
    /// once every rule has been emitted and its address is known.
    pending_calls: Vec<(usize, Symbol)>,
    config: Config,
}

impl Compiler {
    fn emit_rule(&mut self, rule: &Rule) {
        let addr = self.code.len() as Addr;
        self.entries.insert(rule.name, addr);
        self.emit_expr(&rule.expr);
        self.code.push(Instruction::Return);
    }

    fn patch_calls(&mut self) {
        for (idx, target) in std::mem::take(&mut self.pending_calls) {
            let addr = *self
                .entries
                .get(&target)
                .expect("semantic::run guarantees every Ref names a defined rule");
            self.code[idx] = Instruction::Call(addr);
        }
    }

    fn charset_id(&mut self, cs: &CharSet) -> CharsetId {
        if self.config.add_charsets {
            if let Some(pos) = self.charsets.iter().position(|existing| existing == cs) {
                return pos as CharsetId;
            }
        }
        self.charsets.push(cs.clone());
        (self.charsets.len() - 1) as CharsetId
    }

    fn patch_jump(&mut self, idx: usize, target: Addr) {
        match &mut self.code[idx] {
            Instruction::Choice(t) | Instruction::Commit(t) | Instruction::PartialCommit(t) | Instruction::BackCommit(t) | Instruction::Jump(t) => {
                *t = target;
            }
            other => unreachable!("patch target at {idx} is not jump-like: {other:?}"),
        }
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Empty => {}
            ExprKind::Any => self.code.push(Instruction::Any),
            ExprKind::Literal(bytes) => {
                for &b in bytes {
                    self.code.push(Instruction::Char(b));
                }
            }
            ExprKind::Class(cs) => {
                let id = self.charset_id(cs);
                self.code.push(Instruction::Span(id));
            }
            ExprKind::Ref(sym) => {
                let idx = self.code.len();
                self.code.push(Instruction::Call(0));
                self.pending_calls.push((idx, *sym));
            }
            ExprKind::Seq(items) => {
                for item in items {
                    self.emit_expr(item);
                }
            }
            ExprKind::Choice(alts) => self.emit_choice(alts),
            ExprKind::Star(a) => self.emit_star(a),
            ExprKind::Plus(a) => {
                self.emit_expr(a);
                self.emit_star(a);
            }
            ExprKind::Opt(a) => self.emit_opt(a),
            ExprKind::And(a) => self.emit_and(a),
            ExprKind::Not(a) => self.emit_not(a),
            ExprKind::Throw(label) => self.code.push(Instruction::Throw(*label)),
            ExprKind::Labeled(a, label) => self.emit_labeled(a, *label),
            ExprKind::Capture(a, name) => {
                if self.config.captures {
                    self.code.push(Instruction::CaptureBegin(CaptureKind::Node, *name));
                    self.emit_expr(a);
                    self.code.push(Instruction::CaptureEnd);
                } else {
                    self.emit_expr(a);
                }
            }
            ExprKind::CaptureRange(a) => {
                if self.config.captures {
                    self.code.push(Instruction::CaptureBegin(CaptureKind::String, None));
                    self.emit_expr(a);
                    self.code.push(Instruction::CaptureEnd);
                } else {
                    self.emit_expr(a);
                }
            }
        }
    }

    /// `Choice L1; ⟨a⟩; Commit L2; L1: ⟨b⟩; L2:`, generalized to N
    /// alternatives by chaining: every alternative but the last gets its
    /// own `Choice`/`Commit` pair, and every `Commit` targets the shared
    /// end label.
    fn emit_choice(&mut self, alts: &[Expr]) {
        let merged;
        let alts = if self.config.optimize >= 1 {
            merged = optimize::merge_choice_alternatives(alts.to_vec());
            merged.as_slice()
        } else {
            alts
        };

        if alts.len() == 1 {
            self.emit_expr(&alts[0]);
            return;
        }

        let mut commit_patches = Vec::new();
        for alt in &alts[..alts.len() - 1] {
            let choice_idx = self.code.len();
            self.code.push(Instruction::Choice(0));
            self.emit_expr(alt);
            let commit_idx = self.code.len();
            self.code.push(Instruction::Commit(0));
            commit_patches.push(commit_idx);
            let next = self.code.len() as Addr;
            self.patch_jump(choice_idx, next);
        }
        self.emit_expr(&alts[alts.len() - 1]);
        let end = self.code.len() as Addr;
        for idx in commit_patches {
            self.patch_jump(idx, end);
        }
    }

    /// `L1: Choice L2; ⟨a⟩; PartialCommit L1; L2:`
    fn emit_star(&mut self, a: &Expr) {
        let l1 = self.code.len() as Addr;
        let choice_idx = self.code.len();
        self.code.push(Instruction::Choice(0));
        self.emit_expr(a);
        self.code.push(Instruction::PartialCommit(l1));
        let l2 = self.code.len() as Addr;
        self.patch_jump(choice_idx, l2);
    }

    /// `Choice L1; ⟨a⟩; Commit L1; L1:`
    fn emit_opt(&mut self, a: &Expr) {
        let choice_idx = self.code.len();
        self.code.push(Instruction::Choice(0));
        self.emit_expr(a);
        let commit_idx = self.code.len();
        self.code.push(Instruction::Commit(0));
        let l1 = self.code.len() as Addr;
        self.patch_jump(choice_idx, l1);
        self.patch_jump(commit_idx, l1);
    }

    /// `Choice L1; ⟨a⟩; BackCommit L2; L1: Fail; L2:`
    fn emit_and(&mut self, a: &Expr) {
        let choice_idx = self.code.len();
        self.code.push(Instruction::Choice(0));
        self.emit_expr(a);
        let backcommit_idx = self.code.len();
        self.code.push(Instruction::BackCommit(0));
        let l1 = self.code.len() as Addr;
        self.patch_jump(choice_idx, l1);
        self.code.push(Instruction::Fail);
        let l2 = self.code.len() as Addr;
        self.patch_jump(backcommit_idx, l2);
    }

    /// `Choice L1; ⟨a⟩; FailTwice; L1:`
    fn emit_not(&mut self, a: &Expr) {
        let choice_idx = self.code.len();
        self.code.push(Instruction::Choice(0));
        self.emit_expr(a);
        self.code.push(Instruction::FailTwice);
        let l1 = self.code.len() as Addr;
        self.patch_jump(choice_idx, l1);
    }

    /// `Choice L1; ⟨a⟩; Commit L2; L1: Throw l; L2:`
    fn emit_labeled(&mut self, a: &Expr, label: Symbol) {
        let choice_idx = self.code.len();
        self.code.push(Instruction::Choice(0));
        self.emit_expr(a);
        let commit_idx = self.code.len();
        self.code.push(Instruction::Commit(0));
        let l1 = self.code.len() as Addr;
        self.patch_jump(choice_idx, l1);
        self.code.push(Instruction::Throw(label));
        let l2 = self.code.len() as Addr;
        self.patch_jump(commit_idx, l2);
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod compile_tests;
