//! Grammar text → AST. A hand-rolled recursive-descent parser over the
//! `logos` token stream: lexer first, then a precedence-climbing descent
//! over operators, producing langpeg's PEG AST.
//!
//! Precedence, low to high: choice `/`, sequence (juxtaposition), prefix
//! `! &`, suffix `? * +`, then the `^label` suffix on top of all of that.

mod charclass;
mod escapes;

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;


use langpeg_core::{Expr, ExprKind, Grammar, ImportDirective, Interner, Rule, Span};

use crate::error::ParseError;
use crate::lexer::{Lexed, Token, lex};

/// Parse one grammar source into an AST, interning every identifier
/// (rule names, capture names, labels) through `strings`.
pub fn parse(source: &str, strings: &mut Interner) -> Result<Grammar, ParseError> {
    let tokens = lex(source);
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
        strings,
    };
    let mut grammar = Grammar::new();
    let mut seen_rule = false;

    while !parser.is_eof() {
        if parser.peek_is(Token::At) {
            if seen_rule {
                return Err(ParseError::UnexpectedToken {
                    span: parser.current_span(),
                    found: "@import after rule definitions".to_owned(),
                });
            }
            grammar.imports.push(parser.parse_import()?);
        } else {
            grammar.define(parser.parse_rule()?);
            seen_rule = true;
        }
    }

    Ok(grammar)
}

struct Parser<'s, 'i> {
    tokens: Vec<Lexed>,
    pos: usize,
    source: &'s str,
    strings: &'i mut Interner,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<&Lexed> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek().map(|l| l.token.clone())
    }

    fn peek_is(&self, t: Token) -> bool {
        self.peek_token() == Some(t)
    }

    fn peek2_is(&self, t: Token) -> bool {
        self.tokens.get(self.pos + 1).map(|l| l.token.clone()) == Some(t)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_span(&self) -> Span {
        match self.peek() {
            Some(l) => Span::new(l.start, l.end),
            None => {
                let end = self.source.len() as u32;
                Span::new(end, end)
            }
        }
    }

    fn advance(&mut self) -> Option<Lexed> {
        let l = self.tokens.get(self.pos).cloned();
        if l.is_some() {
            self.pos += 1;
        }
        l
    }

    fn expect(&mut self, t: Token) -> Result<Lexed, ParseError> {
        if self.peek_is(t) {
            Ok(self.advance().expect("peek_is confirmed a token"))
        } else {
            Err(ParseError::UnexpectedToken {
                span: self.current_span(),
                found: self.describe_current(),
            })
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if self.peek_is(Token::Ident) {
            Ok(self.advance().expect("peek_is confirmed a token").text)
        } else {
            Err(ParseError::UnexpectedToken {
                span: self.current_span(),
                found: self.describe_current(),
            })
        }
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(l) => format!("{:?} {:?}", l.token, l.text),
            None => "end of input".to_owned(),
        }
    }

    fn parse_import(&mut self) -> Result<ImportDirective, ParseError> {
        let start = self.current_span().start;
        self.expect(Token::At)?;

        let mut names = vec![self.intern_expect_ident()?];
        while self.peek_is(Token::Comma) {
            self.advance();
            names.push(self.intern_expect_ident()?);
        }

        let keyword = self.expect_ident()?;
        if keyword != "from" {
            return Err(ParseError::UnexpectedToken {
                span: self.current_span(),
                found: keyword,
            });
        }

        let path_tok = self.expect(Token::StringLit)?;
        let path = path_tok.text[1..path_tok.text.len() - 1].to_owned();

        Ok(ImportDirective {
            names,
            path,
            span: Span::new(start, path_tok.end),
        })
    }

    fn intern_expect_ident(&mut self) -> Result<langpeg_core::Symbol, ParseError> {
        let text = self.expect_ident()?;
        Ok(self.strings.intern(&text))
    }

    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let start = self.current_span().start;
        let name_text = self.expect_ident()?;
        if !self.peek_is(Token::Arrow) {
            return Err(ParseError::MissingArrow {
                span: self.current_span(),
            });
        }
        self.advance();

        let expr = self.parse_choice()?;
        let name = self.strings.intern(&name_text);
        let end = expr.span.end;
        Ok(Rule {
            name,
            span: Span::new(start, end),
            syntactic: None,
            expr,
        })
    }

    fn parse_choice(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_seq()?;
        if !self.peek_is(Token::Slash) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut alts = vec![first];
        while self.peek_is(Token::Slash) {
            self.advance();
            alts.push(self.parse_seq()?);
        }
        let end = alts.last().expect("just pushed").span.end;
        Ok(Expr::new(ExprKind::Choice(alts), Span::new(start, end)))
    }

    fn parse_seq(&mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        while self.can_start_primary() {
            items.push(self.parse_label()?);
        }

        match items.len() {
            0 => {
                let pos = self.current_span().start;
                Ok(Expr::new(ExprKind::Empty, Span::at(pos)))
            }
            1 => Ok(items.into_iter().next().expect("len == 1")),
            _ => {
                let start = items.first().expect("len > 1").span.start;
                let end = items.last().expect("len > 1").span.end;
                Ok(Expr::new(ExprKind::Seq(items), Span::new(start, end)))
            }
        }
    }

    /// Whether the current token can begin a primary expression. An
    /// `Ident` only counts if it is not the start of the *next* rule
    /// definition (`Name <-`), since the dialect has no sequence
    /// terminator — a rule body simply ends where the next `Name <-`
    /// begins.
    fn can_start_primary(&self) -> bool {
        match self.peek_token() {
            Some(
                Token::StringLit | Token::CharClass | Token::Dot | Token::LParen | Token::Percent | Token::Bang | Token::Amp,
            ) => true,
            Some(Token::Ident) => !self.peek2_is(Token::Arrow),
            _ => false,
        }
    }

    fn parse_label(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_prefix()?;
        if !self.peek_is(Token::Caret) {
            return Ok(expr);
        }
        self.advance();
        let label_text = self.expect_ident()?;
        let label = self.strings.intern(&label_text);
        let start = expr.span.start;
        let end = self.tokens[self.pos - 1].end;
        Ok(Expr::new(
            ExprKind::Labeled(Box::new(expr), label),
            Span::new(start, end),
        ))
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if self.peek_is(Token::Bang) {
            let start = self.current_span().start;
            self.advance();
            let inner = self.parse_prefix()?;
            let end = inner.span.end;
            return Ok(Expr::new(ExprKind::Not(Box::new(inner)), Span::new(start, end)));
        }
        if self.peek_is(Token::Amp) {
            let start = self.current_span().start;
            self.advance();
            let inner = self.parse_prefix()?;
            let end = inner.span.end;
            return Ok(Expr::new(ExprKind::And(Box::new(inner)), Span::new(start, end)));
        }
        self.parse_suffix()
    }

    fn parse_suffix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let ctor: fn(Box<Expr>) -> ExprKind = match self.peek_token() {
                Some(Token::Star) => ExprKind::Star,
                Some(Token::Plus) => ExprKind::Plus,
                Some(Token::Question) => ExprKind::Opt,
                _ => break,
            };
            let end = self.current_span().end;
            self.advance();
            let start = expr.span.start;
            expr = Expr::new(ctor(Box::new(expr)), Span::new(start, end));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span().start;
        match self.peek_token() {
            Some(Token::Dot) => {
                self.advance();
                Ok(Expr::new(ExprKind::Any, Span::new(start, self.prev_end())))
            }
            Some(Token::StringLit) => {
                let lexed = self.advance().expect("peeked");
                let content = &lexed.text[1..lexed.text.len() - 1];
                let span = Span::new(lexed.start, lexed.end);
                let bytes = escapes::decode_literal(content, span)?;
                Ok(Expr::new(ExprKind::Literal(bytes), span))
            }
            Some(Token::CharClass) => {
                let lexed = self.advance().expect("peeked");
                let content = &lexed.text[1..lexed.text.len() - 1];
                let span = Span::new(lexed.start, lexed.end);
                let set = charclass::parse_charclass(content, span)?;
                Ok(Expr::new(ExprKind::Class(set), span))
            }
            Some(Token::Ident) => {
                let lexed = self.advance().expect("peeked");
                let sym = self.strings.intern(&lexed.text);
                Ok(Expr::new(ExprKind::Ref(sym), Span::new(lexed.start, lexed.end)))
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_choice()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Percent) => {
                self.advance();
                if self.peek_is(Token::LBrace) {
                    self.advance();
                    let inner = self.parse_choice()?;
                    let rbrace = self.expect(Token::RBrace)?;
                    Ok(Expr::new(ExprKind::CaptureRange(Box::new(inner)), Span::new(start, rbrace.end)))
                } else {
                    let inner = self.parse_primary()?;
                    let name = match &inner.kind {
                        ExprKind::Ref(sym) => Some(*sym),
                        _ => None,
                    };
                    let end = inner.span.end;
                    Ok(Expr::new(ExprKind::Capture(Box::new(inner), name), Span::new(start, end)))
                }
            }
            _ => Err(ParseError::UnexpectedToken {
                span: self.current_span(),
                found: self.describe_current(),
            }),
        }
    }

    fn prev_end(&self) -> u32 {
        self.tokens.get(self.pos - 1).map(|l| l.end).unwrap_or(0)
    }
}
