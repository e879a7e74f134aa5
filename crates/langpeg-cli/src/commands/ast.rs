//! `langpeg ast`: parse a grammar and print its AST. `--ast-only` stops
//! after the hand-rolled parser; otherwise imports are resolved and the
//! semantic pass runs first, so rule classification (syntactic/lexical)
//! shows up in the printed tree too.

use std::fmt::Write as _;

use langpeg_compiler::{Config, CompileError};
use langpeg_core::{Expr, ExprKind, Grammar, Interner, Rule};

use crate::cli::AstParams;
use crate::util::{self, EXIT_GRAMMAR_ERROR, EXIT_SUCCESS, EXIT_USAGE, render_compile_error};

pub fn run(params: AstParams) -> i32 {
    let source = match util::read_grammar(&params.grammar) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let mut strings = Interner::new();
    let mut grammar = match langpeg_compiler::parser::parse(&source, &mut strings) {
        Ok(g) => g,
        Err(e) => {
            let err = CompileError::Parse(e);
            eprintln!(
                "{}",
                render_compile_error(&err, &source, &params.grammar, params.color)
            );
            return EXIT_GRAMMAR_ERROR;
        }
    };

    if !params.ast_only {
        if let Err(e) =
            langpeg_compiler::resolver::resolve_imports(&mut grammar, &params.grammar, &mut strings)
        {
            let err = CompileError::Import(e);
            eprintln!("error: {err}");
            if let Some(note) = util::import_error_note(&err) {
                eprintln!("  note: {note}");
            }
            return EXIT_GRAMMAR_ERROR;
        }
        if let Err(e) = langpeg_compiler::semantic::run(&mut grammar, &mut strings, &Config::default())
        {
            let err = CompileError::Semantic(e);
            eprintln!(
                "{}",
                render_compile_error(&err, &source, &params.grammar, params.color)
            );
            return EXIT_GRAMMAR_ERROR;
        }
    }

    println!("{}", pretty_grammar(&grammar, &strings));
    EXIT_SUCCESS
}

fn pretty_grammar(grammar: &Grammar, strings: &Interner) -> String {
    let mut out = String::new();
    for (_, rule) in &grammar.rules {
        pretty_rule(rule, strings, &mut out);
    }
    out
}

fn pretty_rule(rule: &Rule, strings: &Interner, out: &mut String) {
    let kind = match rule.syntactic {
        Some(true) => " (syntactic)",
        Some(false) => " (lexical)",
        None => "",
    };
    let _ = writeln!(out, "{}{kind} <-", strings.resolve(rule.name));
    pretty_expr(&rule.expr, strings, 1, out);
}

fn pretty_expr(expr: &Expr, strings: &Interner, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match &expr.kind {
        ExprKind::Empty => {
            let _ = writeln!(out, "{indent}Empty");
        }
        ExprKind::Any => {
            let _ = writeln!(out, "{indent}Any");
        }
        ExprKind::Literal(bytes) => {
            let _ = writeln!(out, "{indent}Literal({:?})", String::from_utf8_lossy(bytes));
        }
        ExprKind::Class(cs) => {
            let _ = writeln!(out, "{indent}Class({cs:?})");
        }
        ExprKind::Ref(sym) => {
            let _ = writeln!(out, "{indent}Ref({})", strings.resolve(*sym));
        }
        ExprKind::Seq(items) => {
            let _ = writeln!(out, "{indent}Seq");
            for item in items {
                pretty_expr(item, strings, depth + 1, out);
            }
        }
        ExprKind::Choice(items) => {
            let _ = writeln!(out, "{indent}Choice");
            for item in items {
                pretty_expr(item, strings, depth + 1, out);
            }
        }
        ExprKind::Star(inner) => {
            let _ = writeln!(out, "{indent}Star");
            pretty_expr(inner, strings, depth + 1, out);
        }
        ExprKind::Plus(inner) => {
            let _ = writeln!(out, "{indent}Plus");
            pretty_expr(inner, strings, depth + 1, out);
        }
        ExprKind::Opt(inner) => {
            let _ = writeln!(out, "{indent}Opt");
            pretty_expr(inner, strings, depth + 1, out);
        }
        ExprKind::And(inner) => {
            let _ = writeln!(out, "{indent}And");
            pretty_expr(inner, strings, depth + 1, out);
        }
        ExprKind::Not(inner) => {
            let _ = writeln!(out, "{indent}Not");
            pretty_expr(inner, strings, depth + 1, out);
        }
        ExprKind::Throw(label) => {
            let _ = writeln!(out, "{indent}Throw({})", strings.resolve(*label));
        }
        ExprKind::Labeled(inner, label) => {
            let _ = writeln!(out, "{indent}Labeled({})", strings.resolve(*label));
            pretty_expr(inner, strings, depth + 1, out);
        }
        ExprKind::Capture(inner, name) => {
            let name = name.map(|s| strings.resolve(s)).unwrap_or("<ref>");
            let _ = writeln!(out, "{indent}Capture({name})");
            pretty_expr(inner, strings, depth + 1, out);
        }
        ExprKind::CaptureRange(inner) => {
            let _ = writeln!(out, "{indent}CaptureRange");
            pretty_expr(inner, strings, depth + 1, out);
        }
    }
}
