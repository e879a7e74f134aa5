//! Semantic pass: classifies each rule as syntactic (word-like — a pure
//! terminal composition with no call to another rule) or lexical (it
//! composes other rules, and so is eligible for implicit whitespace
//! insertion between its top-level sequence items), injects the
//! `_`/`EOF`/`SPC` builtins, and validates that every `^label` has a
//! defining recovery rule.
//!
//! **Rule classification.** A naive "syntactic iff every reachable
//! terminal is literal/class/any, with no `Ref` to a non-syntactic rule"
//! reading, taken as a fixed point, classifies nearly every
//! non-pathological grammar as entirely syntactic — a rule composing two
//! syntactic sub-rules in sequence would itself count as syntactic, never
//! triggering whitespace insertion where it's actually wanted
//! (`Pair <- Key ':' Value`). langpeg resolves this the simpler,
//! practical way: any rule containing a `Ref` at all is lexical, full
//! stop; only rules built purely from literals/classes/`.`/combinators
//! over those are syntactic. This keeps classification a single pass
//! with no fixed point needed.
//!
//! Four sub-passes run in sequence over a shared AST: undefined-rule
//! validation, left-recursion detection, rule classification, then
//! implicit-whitespace insertion and label validation. A shared
//! reference-walking helper underlies builtin-reference detection,
//! rule classification, and label collection alike.

use std::collections::HashMap;

use indexmap::IndexSet;

use langpeg_core::{CharRange, CharSet, Expr, ExprKind, Grammar, Interner, Rule, Span, Symbol};

use crate::config::Config;
use crate::error::SemanticError;

/// Run the full semantic pass over `grammar` in place.
pub fn run(grammar: &mut Grammar, strings: &mut Interner, config: &Config) -> Result<(), SemanticError> {
    if config.add_builtins {
        inject_builtins(grammar, strings);
    }
    validate_refs(grammar, strings)?;
    if let Some(rule) = detect_left_recursion(grammar) {
        return Err(SemanticError::LeftRecursion {
            rule: strings.resolve(rule).to_owned(),
        });
    }
    classify_rules(grammar);
    if !config.disable_spaces && !config.capture_spaces {
        insert_implicit_whitespace(grammar, strings);
    }
    validate_labels(grammar, strings)
}

/// Every `Ref` must name a rule the (post-builtin-injection) grammar
/// actually defines.
fn validate_refs(grammar: &Grammar, strings: &Interner) -> Result<(), SemanticError> {
    for rule in grammar.rules.values() {
        check_refs(&rule.expr, grammar, strings)?;
    }
    Ok(())
}

fn check_refs(expr: &Expr, grammar: &Grammar, strings: &Interner) -> Result<(), SemanticError> {
    match &expr.kind {
        ExprKind::Ref(sym) if grammar.get(*sym).is_none() => Err(SemanticError::UndefinedRule {
            name: strings.resolve(*sym).to_owned(),
            span: expr.span,
        }),
        ExprKind::Seq(items) | ExprKind::Choice(items) => {
            items.iter().try_for_each(|e| check_refs(e, grammar, strings))
        }
        ExprKind::Star(a)
        | ExprKind::Plus(a)
        | ExprKind::Opt(a)
        | ExprKind::And(a)
        | ExprKind::Not(a)
        | ExprKind::Labeled(a, _)
        | ExprKind::Capture(a, _)
        | ExprKind::CaptureRange(a) => check_refs(a, grammar, strings),
        _ => Ok(()),
    }
}

/// Detects left recursion: a rule that can call itself again, through
/// any chain of rule calls, before consuming any input. Elimination is
/// explicitly out of scope; flagging it as a
/// compile error instead of letting the VM loop forever at runtime is
/// this crate's own choice.
///
/// Built from a "head position" graph: an edge `A -> B` means `B` can be
/// called at the very start of `A`, without `A` having consumed
/// anything first (accounting for `Seq` items that are nullable, and
/// for every alternative of a `Choice`). A cycle in that graph is left
/// recursion.
fn detect_left_recursion(grammar: &Grammar) -> Option<Symbol> {
    let nullable = nullable_table(grammar);
    let mut graph: HashMap<Symbol, Vec<Symbol>> = HashMap::new();
    for (name, rule) in grammar.rules.iter() {
        let mut refs = Vec::new();
        head_refs(&rule.expr, &nullable, &mut refs);
        graph.insert(*name, refs);
    }

    let mut state: HashMap<Symbol, u8> = HashMap::new();
    for &start in graph.keys() {
        if state.get(&start).copied().unwrap_or(0) == 0 {
            if let Some(found) = left_recursion_dfs(start, &graph, &mut state) {
                return Some(found);
            }
        }
    }
    None
}

/// 0 = unvisited, 1 = on the current DFS path, 2 = fully explored.
fn left_recursion_dfs(node: Symbol, graph: &HashMap<Symbol, Vec<Symbol>>, state: &mut HashMap<Symbol, u8>) -> Option<Symbol> {
    state.insert(node, 1);
    for &child in graph.get(&node).into_iter().flatten() {
        match state.get(&child).copied().unwrap_or(0) {
            0 => {
                if let Some(found) = left_recursion_dfs(child, graph, state) {
                    return Some(found);
                }
            }
            1 => return Some(child),
            _ => {}
        }
    }
    state.insert(node, 2);
    None
}

fn nullable_table(grammar: &Grammar) -> HashMap<Symbol, bool> {
    let mut table: HashMap<Symbol, bool> = grammar.rules.keys().map(|&s| (s, false)).collect();
    for _ in 0..=grammar.rules.len() {
        let mut changed = false;
        for (name, rule) in grammar.rules.iter() {
            let computed = expr_is_nullable(&rule.expr, &table);
            if table.get(name) != Some(&computed) {
                table.insert(*name, computed);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    table
}

fn expr_is_nullable(expr: &Expr, nullable: &HashMap<Symbol, bool>) -> bool {
    match &expr.kind {
        ExprKind::Empty | ExprKind::Star(_) | ExprKind::Opt(_) | ExprKind::And(_) | ExprKind::Not(_) | ExprKind::Throw(_) => true,
        ExprKind::Any | ExprKind::Literal(_) | ExprKind::Class(_) => false,
        ExprKind::Ref(sym) => *nullable.get(sym).unwrap_or(&false),
        ExprKind::Choice(alts) => alts.iter().any(|a| expr_is_nullable(a, nullable)),
        ExprKind::Seq(items) => items.iter().all(|a| expr_is_nullable(a, nullable)),
        ExprKind::Plus(a) | ExprKind::Labeled(a, _) | ExprKind::Capture(a, _) | ExprKind::CaptureRange(a) => expr_is_nullable(a, nullable),
    }
}

/// Collects the set of rules that could be the very next `Call` issued
/// while matching `expr`, without `expr` having consumed any input yet.
fn head_refs(expr: &Expr, nullable: &HashMap<Symbol, bool>, out: &mut Vec<Symbol>) {
    match &expr.kind {
        ExprKind::Ref(sym) => out.push(*sym),
        ExprKind::Choice(alts) => alts.iter().for_each(|a| head_refs(a, nullable, out)),
        ExprKind::Seq(items) => {
            for item in items {
                head_refs(item, nullable, out);
                if !expr_is_nullable(item, nullable) {
                    break;
                }
            }
        }
        ExprKind::Star(a)
        | ExprKind::Plus(a)
        | ExprKind::Opt(a)
        | ExprKind::And(a)
        | ExprKind::Not(a)
        | ExprKind::Labeled(a, _)
        | ExprKind::Capture(a, _)
        | ExprKind::CaptureRange(a) => head_refs(a, nullable, out),
        ExprKind::Empty | ExprKind::Any | ExprKind::Literal(_) | ExprKind::Class(_) | ExprKind::Throw(_) => {}
    }
}

fn whitespace_charset() -> CharSet {
    CharSet::from_ranges(vec![
        CharRange::single(b' ' as u32),
        CharRange::single(b'\t' as u32),
        CharRange::single(b'\r' as u32),
        CharRange::single(b'\n' as u32),
    ])
}

/// Inject `_ <- [ \t\r\n]*` if undefined (always, so implicit-whitespace
/// insertion has something to call), and `EOF <- !.` / `SPC <- [
/// \t\r\n]` only when some rule already references them but none
/// defines them.
fn inject_builtins(grammar: &mut Grammar, strings: &mut Interner) {
    let underscore = strings.intern("_");
    if grammar.get(underscore).is_none() {
        let body = Expr::new(
            ExprKind::Star(Box::new(Expr::new(ExprKind::Class(whitespace_charset()), Span::at(0)))),
            Span::at(0),
        );
        grammar.rules.insert(
            underscore,
            Rule {
                name: underscore,
                span: Span::at(0),
                syntactic: Some(true),
                expr: body,
            },
        );
    }

    let eof = strings.intern("EOF");
    if grammar.get(eof).is_none() && references_symbol(grammar, eof) {
        let not_any = Expr::new(ExprKind::Not(Box::new(Expr::new(ExprKind::Any, Span::at(0)))), Span::at(0));
        grammar.rules.insert(
            eof,
            Rule {
                name: eof,
                span: Span::at(0),
                syntactic: Some(true),
                expr: not_any,
            },
        );
    }

    let spc = strings.intern("SPC");
    if grammar.get(spc).is_none() && references_symbol(grammar, spc) {
        let body = Expr::new(ExprKind::Class(whitespace_charset()), Span::at(0));
        grammar.rules.insert(
            spc,
            Rule {
                name: spc,
                span: Span::at(0),
                syntactic: Some(true),
                expr: body,
            },
        );
    }
}

fn references_symbol(grammar: &Grammar, sym: Symbol) -> bool {
    grammar.rules.values().any(|r| expr_references(&r.expr, sym))
}

fn expr_references(expr: &Expr, sym: Symbol) -> bool {
    match &expr.kind {
        ExprKind::Ref(s) => *s == sym,
        ExprKind::Seq(items) | ExprKind::Choice(items) => items.iter().any(|e| expr_references(e, sym)),
        ExprKind::Star(a)
        | ExprKind::Plus(a)
        | ExprKind::Opt(a)
        | ExprKind::And(a)
        | ExprKind::Not(a)
        | ExprKind::Labeled(a, _)
        | ExprKind::Capture(a, _)
        | ExprKind::CaptureRange(a) => expr_references(a, sym),
        ExprKind::Empty | ExprKind::Any | ExprKind::Literal(_) | ExprKind::Class(_) | ExprKind::Throw(_) => false,
    }
}

/// A rule's body is syntactic (word-like) iff it contains no `Ref` at
/// all — see the Open Question resolution in this module's doc comment.
fn classify_rules(grammar: &mut Grammar) {
    let names: Vec<Symbol> = grammar.rules.keys().copied().collect();
    for name in names {
        let syntactic = !expr_contains_ref(&grammar.rules[&name].expr);
        grammar.rules.get_mut(&name).expect("name came from this map's keys").syntactic = Some(syntactic);
    }
}

fn expr_contains_ref(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Ref(_) => true,
        ExprKind::Seq(items) | ExprKind::Choice(items) => items.iter().any(expr_contains_ref),
        ExprKind::Star(a)
        | ExprKind::Plus(a)
        | ExprKind::Opt(a)
        | ExprKind::And(a)
        | ExprKind::Not(a)
        | ExprKind::Labeled(a, _)
        | ExprKind::Capture(a, _)
        | ExprKind::CaptureRange(a) => expr_contains_ref(a),
        ExprKind::Empty | ExprKind::Any | ExprKind::Literal(_) | ExprKind::Class(_) | ExprKind::Throw(_) => false,
    }
}

/// Insert a call to `_` between every pair of items in a lexical rule's
/// top-level sequence, if the grammar defines `_`.
fn insert_implicit_whitespace(grammar: &mut Grammar, strings: &mut Interner) {
    let underscore = strings.intern("_");
    if grammar.get(underscore).is_none() {
        return;
    }

    let names: Vec<Symbol> = grammar.rules.keys().copied().collect();
    for name in names {
        let is_lexical = grammar.get(name).and_then(|r| r.syntactic) == Some(false);
        if !is_lexical {
            continue;
        }

        let rule = grammar.rules.get_mut(&name).expect("name came from this map's keys");
        let ExprKind::Seq(items) = &rule.expr.kind else {
            continue;
        };
        if items.len() < 2 {
            continue;
        }

        let mut spaced = Vec::with_capacity(items.len() * 2 - 1);
        for (i, item) in items.iter().cloned().enumerate() {
            if i > 0 {
                spaced.push(Expr::new(ExprKind::Ref(underscore), Span::at(item.span.start)));
            }
            spaced.push(item);
        }
        rule.expr = Expr::new(ExprKind::Seq(spaced), rule.expr.span);
    }
}

/// Every `^label` must name a defined rule to serve as its recovery
/// expression (an empty-bodied rule is fine — it just raises the error
/// without consuming). A bare `Throw(l)` with no matching rule is not
/// an error here: §4.7 treats that as a runtime fallback to `Fail`,
/// not a compile-time failure, so only the suffix form is validated.
fn validate_labels(grammar: &Grammar, strings: &Interner) -> Result<(), SemanticError> {
    let mut labels = IndexSet::new();
    for rule in grammar.rules.values() {
        collect_labels(&rule.expr, &mut labels);
    }
    for label in labels {
        if grammar.get(label).is_none() {
            return Err(SemanticError::MissingRecovery {
                label: strings.resolve(label).to_owned(),
            });
        }
    }
    Ok(())
}

fn collect_labels(expr: &Expr, labels: &mut IndexSet<Symbol>) {
    match &expr.kind {
        ExprKind::Labeled(inner, label) => {
            labels.insert(*label);
            collect_labels(inner, labels);
        }
        ExprKind::Seq(items) | ExprKind::Choice(items) => items.iter().for_each(|e| collect_labels(e, labels)),
        ExprKind::Star(a)
        | ExprKind::Plus(a)
        | ExprKind::Opt(a)
        | ExprKind::And(a)
        | ExprKind::Not(a)
        | ExprKind::Capture(a, _)
        | ExprKind::CaptureRange(a) => collect_labels(a, labels),
        ExprKind::Empty | ExprKind::Any | ExprKind::Literal(_) | ExprKind::Class(_) | ExprKind::Ref(_) | ExprKind::Throw(_) => {}
    }
}

#[cfg(test)]
#[path = "semantic_tests.rs"]
mod semantic_tests;
