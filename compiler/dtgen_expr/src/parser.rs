//! Recursive-descent parser for marker bodies.
//!
//! ```text
//! body      := statement (';' statement)*
//! statement := place assign_op sum | sum (cmp_op sum)?
//! sum       := product (('+' | '-') product)*
//! product   := unary (('*' | '/' | '%') unary)*
//! unary     := ('-' | '!') unary | primary
//! primary   := number | place | '(' sum ')'
//! place     := ident ('[' .. ']' | '(' .. ')' | '.' ident | '->' ident)*
//! ```

use crate::ast::{AssignOp, BinaryOp, CmpOp, Expr, MarkerBody, Number, Place, Statement, UnaryOp};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::ExprError;

/// Parse a marker body.
pub fn parse(src: &str) -> Result<MarkerBody, ExprError> {
    Parser::new(src).body()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            tokens: tokenize(src),
            pos: 0,
        }
    }

    #[inline]
    fn current(&self) -> &Token {
        // `tokenize` always ends with `Eof` and the parser never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ExprError {
        ExprError::malformed(self.src.trim(), message)
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            self.error(format!("expected {expected}, found end of expression"))
        } else {
            self.error(format!(
                "expected {expected}, found `{}`",
                &self.src[token.span.clone()]
            ))
        }
    }

    fn body(&mut self) -> Result<MarkerBody, ExprError> {
        let mut statements = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Semi => {
                    self.bump();
                }
                _ => {
                    statements.push(self.statement()?);
                    match self.current_kind() {
                        TokenKind::Semi | TokenKind::Eof => {}
                        _ => return Err(self.unexpected("`;` or end of expression")),
                    }
                }
            }
        }
        if statements.is_empty() {
            return Err(self.error("empty expression"));
        }
        if statements.len() > 1 && statements.iter().any(Statement::is_boolean) {
            return Err(self.error("a comparison must be the only statement"));
        }
        Ok(MarkerBody { statements })
    }

    fn statement(&mut self) -> Result<Statement, ExprError> {
        let lhs = self.sum()?;
        if let Some(op) = self.match_assign_op() {
            self.bump();
            let Expr::Place(target) = lhs else {
                return Err(self.error(format!("`{}` needs a place on its left", op.as_symbol())));
            };
            let value = self.sum()?;
            return Ok(Statement::Assign { target, op, value });
        }
        if let Some(op) = self.match_cmp_op() {
            self.bump();
            let rhs = self.sum()?;
            if self.match_cmp_op().is_some() {
                return Err(self.error("comparisons cannot be chained"));
            }
            return Ok(Statement::Compare { op, lhs, rhs });
        }
        Ok(Statement::Value(lhs))
    }

    fn sum(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.product()?;
        while let Some(op) = self.match_additive_op() {
            self.bump();
            let rhs = self.product()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn product(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.bump();
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        let Some(op) = self.match_unary_op() else {
            return self.primary();
        };
        self.bump();
        let operand = self.unary()?;
        Ok(match (op, operand) {
            (UnaryOp::Neg, Expr::Num(n)) => Expr::Num(n.negated()),
            (op, operand) => Expr::Unary(op, Box::new(operand)),
        })
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.current_kind() {
            TokenKind::Int => {
                let token = self.bump();
                Ok(Expr::Num(Number::Int(self.src[token.span].to_string())))
            }
            TokenKind::Float => {
                let token = self.bump();
                Ok(Expr::Num(Number::Float(self.src[token.span].to_string())))
            }
            TokenKind::Ident => self.place().map(Expr::Place),
            TokenKind::LParen => {
                self.bump();
                let inner = self.sum()?;
                if self.current_kind() != TokenKind::RParen {
                    return Err(self.unexpected("`)`"));
                }
                self.bump();
                Ok(inner)
            }
            _ => Err(self.unexpected("a number, a place or `(`")),
        }
    }

    fn place(&mut self) -> Result<Place, ExprError> {
        let ident = self.bump();
        let start = ident.span.start;
        let mut end = ident.span.end;
        loop {
            match self.current_kind() {
                TokenKind::LBracket | TokenKind::LParen => end = self.balanced()?,
                TokenKind::Dot | TokenKind::Arrow => {
                    self.bump();
                    if self.current_kind() != TokenKind::Ident {
                        return Err(self.unexpected("a field name"));
                    }
                    end = self.bump().span.end;
                }
                _ => break,
            }
        }
        Ok(Place(self.src[start..end].to_string()))
    }

    /// Skip a bracketed group verbatim. Returns the end of the closing bracket.
    fn balanced(&mut self) -> Result<usize, ExprError> {
        let mut open: Vec<TokenKind> = Vec::new();
        loop {
            let token = self.bump();
            match token.kind {
                TokenKind::LBracket | TokenKind::LParen => open.push(token.kind),
                TokenKind::RBracket | TokenKind::RParen => {
                    let expected = if token.kind == TokenKind::RBracket {
                        TokenKind::LBracket
                    } else {
                        TokenKind::LParen
                    };
                    if open.pop() != Some(expected) {
                        return Err(self.error("mismatched brackets"));
                    }
                    if open.is_empty() {
                        return Ok(token.span.end);
                    }
                }
                TokenKind::Eof => return Err(self.error("unclosed bracket")),
                _ => {}
            }
        }
    }

    fn match_assign_op(&self) -> Option<AssignOp> {
        let op = match self.current_kind() {
            TokenKind::Assign => None,
            TokenKind::PlusAssign => Some(BinaryOp::Add),
            TokenKind::MinusAssign => Some(BinaryOp::Sub),
            TokenKind::StarAssign => Some(BinaryOp::Mul),
            TokenKind::SlashAssign => Some(BinaryOp::Div),
            TokenKind::PercentAssign => Some(BinaryOp::Mod),
            _ => return None,
        };
        Some(AssignOp(op))
    }

    fn match_cmp_op(&self) -> Option<CmpOp> {
        match self.current_kind() {
            TokenKind::EqEq => Some(CmpOp::Eq),
            TokenKind::NotEq => Some(CmpOp::NotEq),
            TokenKind::Lt => Some(CmpOp::Lt),
            TokenKind::LtEq => Some(CmpOp::LtEq),
            TokenKind::Gt => Some(CmpOp::Gt),
            TokenKind::GtEq => Some(CmpOp::GtEq),
            _ => None,
        }
    }

    fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
