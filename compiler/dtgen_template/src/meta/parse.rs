use super::MetaError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum MetaOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl MetaOp {
    pub(super) const fn as_symbol(self) -> &'static str {
        match self {
            MetaOp::Or => "||",
            MetaOp::And => "&&",
            MetaOp::Eq => "==",
            MetaOp::Ne => "!=",
            MetaOp::Lt => "<",
            MetaOp::Le => "<=",
            MetaOp::Gt => ">",
            MetaOp::Ge => ">=",
            MetaOp::Add => "+",
            MetaOp::Sub => "-",
            MetaOp::Mul => "*",
            MetaOp::Div => "/",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Expr {
    Int(i64),
    Str(String),
    Ident(String),
    Field(Box<Expr>, String),
    Call(String, Vec<Expr>),
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary(MetaOp, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Tok {
    Int(i64),
    Str(String),
    Ident(String),
    Punct(&'static str),
    Eof,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Int(n) => format!("`{n}`"),
            Tok::Str(s) => format!("\"{s}\""),
            Tok::Ident(name) => format!("`{name}`"),
            Tok::Punct(p) => format!("`{p}`"),
            Tok::Eof => "end of statement".to_string(),
        }
    }
}

/// Longest first, so `<=` wins over `<`.
const PUNCTS: &[&str] = &[
    "||", "&&", "==", "!=", "<=", ">=", "<", ">", "+", "-", "*", "/", "!", "?", ":", ".", ",",
    "(", ")",
];

fn tokenize(src: &str) -> Result<Vec<Tok>, MetaError> {
    let mut tokens = Vec::new();
    let mut rest = src.trim_start();

    while let Some(c) = rest.chars().next() {
        if c.is_ascii_digit() {
            let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            let n = rest[..len]
                .parse()
                .map_err(|_| MetaError::new(format!("integer `{}` is too large", &rest[..len])))?;
            tokens.push(Tok::Int(n));
            rest = &rest[len..];
        } else if c.is_ascii_alphabetic() || c == '_' {
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            tokens.push(Tok::Ident(rest[..len].to_string()));
            rest = &rest[len..];
        } else if c == '"' {
            let Some(len) = rest[1..].find('"') else {
                return Err(MetaError::new("unterminated string"));
            };
            tokens.push(Tok::Str(rest[1..=len].to_string()));
            rest = &rest[len + 2..];
        } else if let Some(p) = PUNCTS.iter().find(|p| rest.starts_with(**p)) {
            tokens.push(Tok::Punct(*p));
            rest = &rest[p.len()..];
        } else {
            return Err(MetaError::new(format!("unexpected character `{c}`")));
        }
        rest = rest.trim_start();
    }
    tokens.push(Tok::Eof);
    Ok(tokens)
}

pub(super) fn parse(src: &str) -> Result<Expr, MetaError> {
    let mut parser = Parser {
        tokens: tokenize(src)?,
        pos: 0,
    };
    if parser.peek() == &Tok::Eof {
        return Err(MetaError::new("empty statement"));
    }
    let expr = parser.expr()?;
    match parser.peek() {
        Tok::Eof => Ok(expr),
        tok => Err(MetaError::new(format!("unexpected {}", tok.describe()))),
    }
}

struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        // `tokenize` always ends with Eof and `bump` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Tok {
        let tok = self.peek().clone();
        if tok != Tok::Eof {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, punct: &str) -> bool {
        if matches!(self.peek(), Tok::Punct(p) if *p == punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &str) -> Result<(), MetaError> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(MetaError::new(format!(
                "expected `{punct}`, found {}",
                self.peek().describe()
            )))
        }
    }

    fn expr(&mut self) -> Result<Expr, MetaError> {
        let cond = self.binary(0)?;
        if !self.eat("?") {
            return Ok(cond);
        }
        let then = self.expr()?;
        self.expect(":")?;
        let otherwise = self.expr()?;
        Ok(Expr::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise)))
    }

    /// Binary operators by level; level 2 (comparisons) does not chain.
    fn binary(&mut self, level: usize) -> Result<Expr, MetaError> {
        const LEVELS: &[&[(&str, MetaOp)]] = &[
            &[("||", MetaOp::Or)],
            &[("&&", MetaOp::And)],
            &[
                ("==", MetaOp::Eq),
                ("!=", MetaOp::Ne),
                ("<=", MetaOp::Le),
                (">=", MetaOp::Ge),
                ("<", MetaOp::Lt),
                (">", MetaOp::Gt),
            ],
            &[("+", MetaOp::Add), ("-", MetaOp::Sub)],
            &[("*", MetaOp::Mul), ("/", MetaOp::Div)],
        ];

        let Some(ops) = LEVELS.get(level) else {
            return self.unary();
        };
        let mut lhs = self.binary(level + 1)?;
        loop {
            let next = match self.peek() {
                Tok::Punct(p) => ops.iter().find(|(sym, _)| sym == p).map(|(_, op)| *op),
                _ => None,
            };
            let Some(op) = next else {
                break;
            };
            self.pos += 1;
            let rhs = self.binary(level + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
            if level == 2 {
                break;
            }
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, MetaError> {
        if self.eat("!") {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        if self.eat("-") {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        let mut expr = self.primary()?;
        while self.eat(".") {
            match self.bump() {
                Tok::Ident(field) => expr = Expr::Field(Box::new(expr), field),
                tok => {
                    return Err(MetaError::new(format!(
                        "expected a field name, found {}",
                        tok.describe()
                    )))
                }
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, MetaError> {
        match self.bump() {
            Tok::Int(n) => Ok(Expr::Int(n)),
            Tok::Str(s) => Ok(Expr::Str(s)),
            Tok::Ident(name) => {
                if !self.eat("(") {
                    return Ok(Expr::Ident(name));
                }
                let mut args = Vec::new();
                if !self.eat(")") {
                    loop {
                        args.push(self.expr()?);
                        if self.eat(")") {
                            break;
                        }
                        self.expect(",")?;
                    }
                }
                Ok(Expr::Call(name, args))
            }
            Tok::Punct("(") => {
                let inner = self.expr()?;
                self.expect(")")?;
                Ok(inner)
            }
            tok => Err(MetaError::new(format!("unexpected {}", tok.describe()))),
        }
    }
}
