//! Syntax tree of a marker body.

/// Arithmetic operators, in the order they bind (loosest first).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// Operation name used for mangled helpers (`add` → `Add2_<id>`).
    pub const fn helper(self) -> &'static str {
        match self {
            Self::Add => "add2",
            Self::Sub => "sub2",
            Self::Mul => "mul2",
            Self::Div => "div2",
            Self::Mod => "mod2",
        }
    }

    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::Mod => 2,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CmpOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }

    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::NotEq)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// `=` or a compound assignment (`+=` carries `Some(Add)`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct AssignOp(pub Option<BinaryOp>);

impl AssignOp {
    pub fn as_symbol(self) -> &'static str {
        match self.0 {
            None => "=",
            Some(BinaryOp::Add) => "+=",
            Some(BinaryOp::Sub) => "-=",
            Some(BinaryOp::Mul) => "*=",
            Some(BinaryOp::Div) => "/=",
            Some(BinaryOp::Mod) => "%=",
        }
    }
}

/// A numeric literal, kept as written.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Number {
    Int(String),
    Float(String),
}

impl Number {
    pub fn text(&self) -> &str {
        match self {
            Number::Int(text) | Number::Float(text) => text,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Integer literal equal to `value`.
    pub fn is_int_value(&self, value: i64) -> bool {
        match self {
            Number::Int(text) => text.parse::<i64>() == Ok(value),
            Number::Float(_) => false,
        }
    }

    pub(crate) fn negated(self) -> Number {
        let negate = |text: String| match text.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{text}"),
        };
        match self {
            Number::Int(text) => Number::Int(negate(text)),
            Number::Float(text) => Number::Float(negate(text)),
        }
    }
}

/// A storage location as written: `a`, `a[i*n+j]`, `x->r`, `row(i)`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Place(pub String);

impl Place {
    pub fn text(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Expr {
    Num(Number),
    Place(Place),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Statement {
    Assign {
        target: Place,
        op: AssignOp,
        value: Expr,
    },
    Compare {
        op: CmpOp,
        lhs: Expr,
        rhs: Expr,
    },
    Value(Expr),
}

impl Statement {
    pub fn is_boolean(&self) -> bool {
        matches!(self, Statement::Compare { .. })
    }
}

/// Everything between `%%TYPE ` and the closing `%%`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MarkerBody {
    pub statements: Vec<Statement>,
}

impl MarkerBody {
    /// A comparison is always the body's only statement.
    pub fn is_boolean(&self) -> bool {
        matches!(self.statements.as_slice(), [only] if only.is_boolean())
    }
}
