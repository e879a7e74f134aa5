use langpeg_core::{ExprKind, Interner};

use super::parse;

fn rule_kind<'g>(grammar: &'g langpeg_core::Grammar, name: &str, strings: &Interner) -> &'g ExprKind {
    let sym = grammar
        .rules
        .keys()
        .copied()
        .find(|s| strings.resolve(*s) == name)
        .unwrap_or_else(|| panic!("no rule named {name}"));
    &grammar.get(sym).unwrap().expr.kind
}

#[test]
fn parses_a_literal_rule() {
    let mut strings = Interner::new();
    let grammar = parse("Greeting <- 'hello'", &mut strings).unwrap();
    assert!(matches!(rule_kind(&grammar, "Greeting", &strings), ExprKind::Literal(b) if b == b"hello"));
}

#[test]
fn parses_ordered_choice_and_sequence() {
    let mut strings = Interner::new();
    let grammar = parse("S <- 'a' 'b' / 'c'", &mut strings).unwrap();
    match rule_kind(&grammar, "S", &strings) {
        ExprKind::Choice(alts) => {
            assert_eq!(alts.len(), 2);
            assert!(matches!(&alts[0].kind, ExprKind::Seq(items) if items.len() == 2));
            assert!(matches!(&alts[1].kind, ExprKind::Literal(b) if b == b"c"));
        }
        other => panic!("expected Choice, got {other:?}"),
    }
}

#[test]
fn parses_quantifiers_and_lookahead() {
    let mut strings = Interner::new();
    let grammar = parse("S <- &'a' !'b' [0-9]+ .?", &mut strings).unwrap();
    match rule_kind(&grammar, "S", &strings) {
        ExprKind::Seq(items) => {
            assert!(matches!(items[0].kind, ExprKind::And(_)));
            assert!(matches!(items[1].kind, ExprKind::Not(_)));
            assert!(matches!(items[2].kind, ExprKind::Plus(_)));
            assert!(matches!(items[3].kind, ExprKind::Opt(_)));
        }
        other => panic!("expected Seq, got {other:?}"),
    }
}

#[test]
fn stops_sequence_before_next_rule_definition() {
    let mut strings = Interner::new();
    let grammar = parse("A <- 'x' B\nB <- 'y'", &mut strings).unwrap();
    assert!(matches!(rule_kind(&grammar, "A", &strings), ExprKind::Seq(items) if items.len() == 2));
    assert!(matches!(rule_kind(&grammar, "B", &strings), ExprKind::Literal(b) if b == b"y"));
}

#[test]
fn parses_labeled_throw_suffix() {
    let mut strings = Interner::new();
    let grammar = parse("S <- ')'^rparen", &mut strings).unwrap();
    match rule_kind(&grammar, "S", &strings) {
        ExprKind::Labeled(_, label) => assert_eq!(strings.resolve(*label), "rparen"),
        other => panic!("expected Labeled, got {other:?}"),
    }
}

#[test]
fn parses_named_capture_and_block_capture() {
    let mut strings = Interner::new();
    let grammar = parse("S <- %Item %{ [0-9]+ }", &mut strings).unwrap();
    match rule_kind(&grammar, "S", &strings) {
        ExprKind::Seq(items) => {
            match &items[0].kind {
                ExprKind::Capture(inner, name) => {
                    assert!(matches!(inner.kind, ExprKind::Ref(_)));
                    assert_eq!(name.map(|s| strings.resolve(s).to_owned()), Some("Item".to_owned()));
                }
                other => panic!("expected Capture, got {other:?}"),
            }
            assert!(matches!(items[1].kind, ExprKind::CaptureRange(_)));
        }
        other => panic!("expected Seq, got {other:?}"),
    }
}

#[test]
fn parses_empty_rule_body() {
    let mut strings = Interner::new();
    let grammar = parse("lpar <-\nExpr <- 'x'", &mut strings).unwrap();
    assert!(matches!(rule_kind(&grammar, "lpar", &strings), ExprKind::Empty));
}

#[test]
fn parses_import_directive() {
    let mut strings = Interner::new();
    let grammar = parse(r#"@import A, B from "shared.peg"
S <- A"#, &mut strings)
        .unwrap();
    assert_eq!(grammar.imports.len(), 1);
    assert_eq!(grammar.imports[0].path, "shared.peg");
    assert_eq!(grammar.imports[0].names.len(), 2);
}

#[test]
fn rejects_missing_arrow() {
    let mut strings = Interner::new();
    assert!(parse("S 'a'", &mut strings).is_err());
}

#[test]
fn rejects_malformed_char_class() {
    let mut strings = Interner::new();
    assert!(parse(r"S <- [z-a]", &mut strings).is_err());
}

#[test]
fn comments_do_not_affect_parsing() {
    let mut strings = Interner::new();
    let grammar = parse("// comment\nS <- 'a' # trailing\n", &mut strings).unwrap();
    assert!(matches!(rule_kind(&grammar, "S", &strings), ExprKind::Literal(b) if b == b"a"));
}
