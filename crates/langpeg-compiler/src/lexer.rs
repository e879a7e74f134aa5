//! Token stream for the grammar dialect. A hand-rolled recursive-descent
//! parser sits on top of a `logos`-generated lexer.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"'([^'\\]|\\.)*'")]
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,

    #[regex(r"\[([^\]\\]|\\.)*\]")]
    CharClass,

    #[token("@import")]
    At,
    #[token("<-")]
    Arrow,
    #[token("/")]
    Slash,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("&")]
    Amp,
    #[token("!")]
    Bang,
    #[token("^")]
    Caret,
    #[token("%")]
    Percent,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
}

/// One lexed token plus its byte span, ready for the parser to consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub token: Token,
    pub text: String,
    pub start: u32,
    pub end: u32,
}

/// Tokenize a whole grammar source, collecting the lexer's own lexical
/// errors as `Token::Error`-shaped spans (surfaced by the parser as
/// `ParseError::UnexpectedToken`, since the lexer itself carries no
/// diagnostic text beyond "didn't match any pattern").
pub fn lex(source: &str) -> Vec<Lexed> {
    let mut out = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        if let Ok(token) = result {
            out.push(Lexed {
                token,
                text: lexer.slice().to_owned(),
                start: span.start as u32,
                end: span.end as u32,
            });
        }
    }
    out
}
