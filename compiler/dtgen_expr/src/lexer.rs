//! Tokenizer for marker bodies.
//!
//! Bracketed place suffixes hold arbitrary C (`a[i * lda + j]`, `f(x, y)`),
//! so bytes the grammar does not use still lex as [`TokenKind::Other`]
//! instead of failing. The parser rejects them outside brackets.

use std::ops::Range;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum TokenKind {
    Ident,
    Int,
    Float,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Arrow,
    Semi,
    Other,
    Eof,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    fn current(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos + 1).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Consume `next` if it is the current byte.
    fn eat(&mut self, next: u8) -> bool {
        if self.current() == Some(next) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// C numeric literal: decimal, leading-dot or hex, with an optional
    /// exponent and `u`/`l`/`f` suffixes.
    fn number(&mut self) -> TokenKind {
        if self.current() == Some(b'0')
            && matches!(self.peek(), Some(b'x' | b'X'))
            && self.src.get(self.pos + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            self.pos += 2;
            self.eat_while(|b| b.is_ascii_hexdigit());
            self.eat_while(|b| matches!(b, b'u' | b'U' | b'l' | b'L'));
            return TokenKind::Int;
        }
        self.eat_while(|b| b.is_ascii_digit());
        let mut kind = TokenKind::Int;
        if self.eat(b'.') {
            self.eat_while(|b| b.is_ascii_digit());
            kind = TokenKind::Float;
        }
        if matches!(self.current(), Some(b'e' | b'E')) {
            let save = self.pos;
            self.advance();
            if matches!(self.current(), Some(b'+' | b'-')) {
                self.advance();
            }
            if self.current().is_some_and(|b| b.is_ascii_digit()) {
                self.eat_while(|b| b.is_ascii_digit());
                kind = TokenKind::Float;
            } else {
                self.pos = save;
            }
        }
        match kind {
            TokenKind::Float => self.eat_while(|b| matches!(b, b'f' | b'F' | b'l' | b'L')),
            _ => self.eat_while(|b| matches!(b, b'u' | b'U' | b'l' | b'L')),
        }
        kind
    }

    fn next_token(&mut self) -> Token {
        self.eat_while(|b| b.is_ascii_whitespace());
        let start = self.pos;
        let Some(b) = self.current() else {
            return Token {
                kind: TokenKind::Eof,
                span: start..start,
            };
        };
        self.advance();
        let kind = match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
                TokenKind::Ident
            }
            b'0'..=b'9' => {
                self.pos = start;
                self.number()
            }
            b'+' if self.eat(b'=') => TokenKind::PlusAssign,
            b'+' => TokenKind::Plus,
            b'-' if self.eat(b'=') => TokenKind::MinusAssign,
            b'-' if self.eat(b'>') => TokenKind::Arrow,
            b'-' => TokenKind::Minus,
            b'*' if self.eat(b'=') => TokenKind::StarAssign,
            b'*' => TokenKind::Star,
            b'/' if self.eat(b'=') => TokenKind::SlashAssign,
            b'/' => TokenKind::Slash,
            b'%' if self.eat(b'=') => TokenKind::PercentAssign,
            b'%' => TokenKind::Percent,
            b'!' if self.eat(b'=') => TokenKind::NotEq,
            b'!' => TokenKind::Bang,
            b'=' if self.eat(b'=') => TokenKind::EqEq,
            b'=' => TokenKind::Assign,
            b'<' if self.eat(b'=') => TokenKind::LtEq,
            b'<' => TokenKind::Lt,
            b'>' if self.eat(b'=') => TokenKind::GtEq,
            b'>' => TokenKind::Gt,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'.' if self.current().is_some_and(|b| b.is_ascii_digit()) => {
                self.pos = start;
                self.number()
            }
            b'.' => TokenKind::Dot,
            b';' => TokenKind::Semi,
            _ => {
                // Keep multi-byte characters in one token.
                self.eat_while(|b| (0x80..0xC0).contains(&b));
                TokenKind::Other
            }
        };
        Token {
            kind,
            span: start..self.pos,
        }
    }
}

/// Tokenize `src`. The result always ends with one `Eof` token.
pub(crate) fn tokenize(src: &str) -> Vec<Token> {
    let mut cursor = Cursor::new(src);
    let mut tokens = Vec::new();
    loop {
        let token = cursor.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests;
