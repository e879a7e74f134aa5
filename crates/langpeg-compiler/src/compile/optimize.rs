//! Peephole-style optimizations gated by `Config::optimize`, applied to
//! the AST immediately before emission rather than to finished bytecode.
//!
//! langpeg's instruction set (`langpeg_bytecode::Instruction`) has no
//! head-fail test opcode (a `TestChar`/`TestSet` that can fail without
//! pushing a backtrack frame), so there is nothing to lower "head-fail"
//! into without inventing an opcode this crate has no other use for.
//! Literal coalescing is likewise already the emitter's normal behavior
//! (`Literal(s)` compiles straight to one `Char` per byte, never through
//! an intermediate multi-`Choice` form). What a linear Choice/Commit/Fail
//! machine *can* realize without new opcodes is collapsing single-byte
//! alternatives in a `Choice` into one `Class`, which is what this
//! module does.

use langpeg_core::{CharSet, Expr, ExprKind};

/// Collapse a run of single-byte `Literal`/`Class` alternatives inside a
/// `Choice` into one unioned `Class`, e.g. `'a' / 'b' / Foo` becomes
/// `[ab] / Foo` — one `Span` instruction and no `Choice`/`Commit` pair in
/// place of two. Non-adjacent or non-singleton alternatives are left
/// untouched.
pub fn merge_choice_alternatives(alts: Vec<Expr>) -> Vec<Expr> {
    let mut out: Vec<Expr> = Vec::with_capacity(alts.len());
    for alt in alts {
        if let Some(cur_cs) = singleton_class(&alt) {
            if let Some(prev_cs) = out.last().and_then(singleton_class) {
                let prev = out.last_mut().expect("just matched Some above");
                let span = prev.span.join(alt.span);
                *prev = Expr::new(ExprKind::Class(CharSet::union(&prev_cs, &cur_cs)), span);
                continue;
            }
        }
        out.push(alt);
    }
    out
}

fn singleton_class(expr: &Expr) -> Option<CharSet> {
    match &expr.kind {
        ExprKind::Literal(bytes) if bytes.len() == 1 => Some(CharSet::single(bytes[0] as u32)),
        ExprKind::Class(cs) => Some(cs.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langpeg_core::Span;

    fn lit(b: u8) -> Expr {
        Expr::new(ExprKind::Literal(vec![b]), Span::at(0))
    }

    #[test]
    fn merges_adjacent_single_byte_literals() {
        let merged = merge_choice_alternatives(vec![lit(b'a'), lit(b'b'), lit(b'c')]);
        assert_eq!(merged.len(), 1);
        match &merged[0].kind {
            ExprKind::Class(cs) => {
                assert!(cs.contains(b'a' as u32));
                assert!(cs.contains(b'c' as u32));
                assert!(!cs.contains(b'd' as u32));
            }
            other => panic!("expected Class, got {other:?}"),
        }
    }

    #[test]
    fn leaves_non_singleton_alternatives_untouched() {
        let rest = Expr::new(ExprKind::Ref(langpeg_core::Interner::new().intern("Foo")), Span::at(0));
        let merged = merge_choice_alternatives(vec![lit(b'a'), lit(b'b'), rest]);
        assert_eq!(merged.len(), 2);
        assert!(matches!(merged[1].kind, ExprKind::Ref(_)));
    }

    #[test]
    fn multi_byte_literal_is_not_merged() {
        let multi = Expr::new(ExprKind::Literal(vec![b'x', b'y']), Span::at(0));
        let merged = merge_choice_alternatives(vec![lit(b'a'), multi]);
        assert_eq!(merged.len(), 2);
    }
}
