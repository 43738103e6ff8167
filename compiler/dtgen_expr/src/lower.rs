//! Per-category lowering of a parsed marker body.

use dtgen_types::{Category, Mangler, TypeDescriptor};

use crate::ast::{AssignOp, BinaryOp, CmpOp, Expr, MarkerBody, Number, Place, Statement, UnaryOp};
use crate::{ExprError, OpSet, OperatorTable};

const PREC_UNARY: u8 = 3;
const PREC_ATOM: u8 = 4;

/// A lowered sub-expression and how tightly it binds.
struct Lowered {
    text: String,
    prec: u8,
    literal: Option<Number>,
}

impl Lowered {
    fn atom(text: String) -> Self {
        Lowered {
            text,
            prec: PREC_ATOM,
            literal: None,
        }
    }

    fn with_prec(text: String, prec: u8) -> Self {
        Lowered {
            text,
            prec,
            literal: None,
        }
    }

    /// Text, parenthesized when it binds looser than `min`.
    fn at_least(&self, min: u8) -> String {
        if self.prec < min {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }

    /// Struct member access: `x.r`, `(x).r`.
    fn member(&self, field: &str) -> String {
        format!("{}.{field}", self.at_least(PREC_ATOM))
    }
}

/// `-x`, keeping `- -` from fusing into a decrement.
fn negate(text: &str) -> String {
    if text.starts_with('-') {
        format!("-({text})")
    } else {
        format!("-{text}")
    }
}

fn binary_flag(op: BinaryOp) -> OpSet {
    match op {
        BinaryOp::Add => OpSet::ADD,
        BinaryOp::Sub => OpSet::SUB,
        BinaryOp::Mul => OpSet::MUL,
        BinaryOp::Div => OpSet::DIV,
        BinaryOp::Mod => OpSet::MOD,
    }
}

fn cmp_flag(op: CmpOp) -> OpSet {
    match op {
        CmpOp::Eq => OpSet::EQ,
        CmpOp::NotEq => OpSet::NE,
        CmpOp::Lt => OpSet::LT,
        CmpOp::LtEq => OpSet::LE,
        CmpOp::Gt => OpSet::GT,
        CmpOp::GtEq => OpSet::GE,
    }
}

/// Lowers expressions for one target type.
pub(crate) struct Lowerer<'a> {
    pub target: &'a TypeDescriptor,
    /// The bound type when lowering against its widened form.
    pub source: Option<&'a TypeDescriptor>,
    pub mangler: &'a Mangler,
    pub ops: &'a OperatorTable,
}

impl Lowerer<'_> {
    fn category(&self) -> Category {
        self.target.category()
    }

    fn storage(&self) -> String {
        self.target.storage().to_string()
    }

    fn unsupported(&self, op: &str) -> ExprError {
        ExprError::UnsupportedOperation {
            op: op.to_string(),
            sym: self.target.sym().to_string(),
            category: self.category(),
        }
    }

    fn check(&self, flag: OpSet, symbol: &str) -> Result<(), ExprError> {
        if self.ops.allows(self.category(), flag) {
            Ok(())
        } else {
            Err(ExprError::DisabledOperator {
                op: symbol.to_string(),
                category: self.category(),
            })
        }
    }

    /// `Add2_c64`, `Mod2_r32`, ...
    fn helper(&self, op: BinaryOp) -> String {
        self.mangler.mangle(op.helper(), &[self.target])
    }

    /// Lower every statement. The caller has already rejected sentinels.
    pub fn body(&self, body: &MarkerBody) -> Result<Vec<String>, ExprError> {
        body.statements
            .iter()
            .map(|stmt| self.statement(stmt))
            .collect()
    }

    fn statement(&self, stmt: &Statement) -> Result<String, ExprError> {
        match stmt {
            Statement::Assign { target, op, value } => {
                let value = self.expr(value)?;
                self.assign(target, *op, &value)
            }
            Statement::Compare { op, lhs, rhs } => {
                self.check(cmp_flag(*op), op.as_symbol())?;
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                self.compare(*op, &lhs, &rhs)
            }
            Statement::Value(expr) => Ok(self.expr(expr)?.text),
        }
    }

    fn expr(&self, expr: &Expr) -> Result<Lowered, ExprError> {
        match expr {
            Expr::Num(n) => self.literal(n),
            Expr::Place(p) => Ok(self.place(p)),
            Expr::Unary(op, operand) => {
                let flag = match op {
                    UnaryOp::Neg => OpSet::NEG,
                    UnaryOp::Not => OpSet::NOT,
                };
                self.check(flag, op.as_symbol())?;
                let operand = self.expr(operand)?;
                self.unary(*op, &operand)
            }
            Expr::Binary(op, lhs, rhs) => {
                self.check(binary_flag(*op), op.as_symbol())?;
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                self.binary(*op, &lhs, &rhs)
            }
        }
    }

    fn literal(&self, n: &Number) -> Result<Lowered, ExprError> {
        let text = match self.category() {
            Category::Integer | Category::Float => {
                let prec = if n.text().starts_with('-') {
                    PREC_UNARY
                } else {
                    PREC_ATOM
                };
                return Ok(Lowered {
                    text: n.text().to_string(),
                    prec,
                    literal: Some(n.clone()),
                });
            }
            Category::Complex => format!("({}){{ {}, 0 }}", self.storage(), n.text()),
            Category::Rational if n.is_int() => {
                format!("({}){{ {}, 1 }}", self.storage(), n.text())
            }
            Category::Rational => return Err(self.unsupported("float literal")),
            Category::Object if n.is_int() => format!("INT2FIX({})", n.text()),
            Category::Object => format!("rb_float_new({})", n.text()),
            Category::None => return Err(self.unsupported(n.text())),
        };
        Ok(Lowered {
            text,
            prec: PREC_ATOM,
            literal: Some(n.clone()),
        })
    }

    /// A right-hand place, converted to the target type when widening.
    fn place(&self, place: &Place) -> Lowered {
        let text = place.text();
        let widening = self.source.is_some_and(|source| source != self.target);
        if !widening {
            return Lowered::atom(text.to_string());
        }
        let storage = self.storage();
        match self.category() {
            Category::Integer | Category::Float => {
                Lowered::with_prec(format!("({storage}){text}"), PREC_UNARY)
            }
            Category::Complex => Lowered::atom(format!("({storage}){{ {text}.r, {text}.i }}")),
            Category::Rational => Lowered::atom(format!("({storage}){{ {text}.n, {text}.d }}")),
            Category::Object | Category::None => Lowered::atom(text.to_string()),
        }
    }

    fn binary(&self, op: BinaryOp, lhs: &Lowered, rhs: &Lowered) -> Result<Lowered, ExprError> {
        match self.category() {
            Category::Float if op == BinaryOp::Mod => {
                Ok(Lowered::atom(format!("fmod({}, {})", lhs.text, rhs.text)))
            }
            Category::Integer | Category::Float => {
                let prec = op.precedence();
                Ok(Lowered::with_prec(
                    format!(
                        "{} {} {}",
                        lhs.at_least(prec),
                        op.as_symbol(),
                        rhs.at_least(prec + 1)
                    ),
                    prec,
                ))
            }
            Category::Complex if op == BinaryOp::Mod => Err(self.unsupported(op.as_symbol())),
            Category::Complex | Category::Rational => Ok(Lowered::atom(format!(
                "{}({}, {})",
                self.helper(op),
                lhs.text,
                rhs.text
            ))),
            Category::Object => Ok(Lowered::atom(format!(
                "rb_funcall({}, rb_intern(\"{}\"), 1, {})",
                lhs.text,
                op.as_symbol(),
                rhs.text
            ))),
            Category::None => Err(self.unsupported(op.as_symbol())),
        }
    }

    fn unary(&self, op: UnaryOp, operand: &Lowered) -> Result<Lowered, ExprError> {
        let storage = self.storage();
        let text = match (self.category(), op) {
            (Category::Integer | Category::Float, UnaryOp::Neg) => {
                return Ok(Lowered::with_prec(
                    negate(&operand.at_least(PREC_UNARY)),
                    PREC_UNARY,
                ));
            }
            (Category::Integer | Category::Float, UnaryOp::Not) => {
                return Ok(Lowered::with_prec(
                    format!("!{}", operand.at_least(PREC_UNARY)),
                    PREC_UNARY,
                ));
            }
            (Category::Complex, UnaryOp::Neg) => format!(
                "({storage}){{ {}, {} }}",
                negate(&self.component(operand, "r")),
                negate(&self.component(operand, "i"))
            ),
            (Category::Rational, UnaryOp::Neg) => format!(
                "({storage}){{ {}, {} }}",
                negate(&self.component(operand, "n")),
                self.component(operand, "d")
            ),
            (Category::Rational, UnaryOp::Not) => {
                format!("({storage}){{ !{}, 1 }}", self.component(operand, "n"))
            }
            (Category::Object, UnaryOp::Neg) => {
                format!("rb_funcall({}, rb_intern(\"-@\"), 0)", operand.text)
            }
            (Category::Object, UnaryOp::Not) => {
                format!("rb_funcall({}, rb_intern(\"!\"), 0)", operand.text)
            }
            (Category::Complex | Category::None, _) => {
                return Err(self.unsupported(op.as_symbol()));
            }
        };
        Ok(Lowered::atom(text))
    }

    /// One field of a struct-valued operand. Literals expand to their parts.
    fn component(&self, value: &Lowered, field: &str) -> String {
        match (&value.literal, field) {
            (Some(n), "r" | "n") => n.text().to_string(),
            (Some(_), "i") => "0".to_string(),
            (Some(_), "d") => "1".to_string(),
            _ => value.member(field),
        }
    }

    fn compare(&self, op: CmpOp, lhs: &Lowered, rhs: &Lowered) -> Result<String, ExprError> {
        let sym = op.as_symbol();
        match self.category() {
            Category::Integer | Category::Float => {
                Ok(format!("{} {sym} {}", lhs.text, rhs.text))
            }
            Category::Complex if op.is_equality() => {
                let join = if op == CmpOp::Eq { "&&" } else { "||" };
                Ok(format!(
                    "{} {sym} {} {join} {} {sym} {}",
                    self.component(lhs, "r"),
                    self.component(rhs, "r"),
                    self.component(lhs, "i"),
                    self.component(rhs, "i"),
                ))
            }
            Category::Rational if op.is_equality() => Ok(self.rational_equality(op, lhs, rhs)),
            Category::Rational => Ok(format!(
                "(int64_t){} * {} {sym} (int64_t){} * {}",
                self.component(lhs, "n"),
                self.component(rhs, "d"),
                self.component(rhs, "n"),
                self.component(lhs, "d"),
            )),
            Category::Object => Ok(format!(
                "RTEST(rb_funcall({}, rb_intern(\"{sym}\"), 1, {}))",
                lhs.text, rhs.text
            )),
            Category::Complex | Category::None => Err(self.unsupported(sym)),
        }
    }

    /// Equality with shortcuts for the literals 0 and 1.
    fn rational_equality(&self, op: CmpOp, lhs: &Lowered, rhs: &Lowered) -> String {
        let sym = op.as_symbol();
        let is_lit = |v: &Lowered, k: i64| v.literal.as_ref().is_some_and(|n| n.is_int_value(k));
        let (value, other) = if is_lit(lhs, 0) || is_lit(lhs, 1) {
            (rhs, lhs)
        } else {
            (lhs, rhs)
        };
        if is_lit(other, 0) {
            return format!("{} {sym} 0", self.component(value, "n"));
        }
        if is_lit(other, 1) {
            return format!(
                "{} {sym} {}",
                self.component(value, "n"),
                self.component(value, "d")
            );
        }
        let join = if op == CmpOp::Eq { "&&" } else { "||" };
        format!(
            "{} {sym} {} {join} {} {sym} {}",
            self.component(lhs, "n"),
            self.component(rhs, "n"),
            self.component(lhs, "d"),
            self.component(rhs, "d"),
        )
    }

    fn assign(&self, target: &Place, op: AssignOp, value: &Lowered) -> Result<String, ExprError> {
        let place = target.text();
        let Some(bin) = op.0 else {
            return Ok(format!("{place} = {}", value.text));
        };
        self.check(binary_flag(bin), op.as_symbol())?;
        match self.category() {
            Category::Float if bin == BinaryOp::Mod => {
                Ok(format!("{place} = fmod({place}, {})", value.text))
            }
            Category::Integer | Category::Float => {
                Ok(format!("{place} {} {}", op.as_symbol(), value.text))
            }
            Category::Complex if bin == BinaryOp::Mod => Err(self.unsupported(op.as_symbol())),
            Category::Complex | Category::Rational => Ok(format!(
                "{place} = {}({place}, {})",
                self.helper(bin),
                value.text
            )),
            Category::Object => Ok(format!(
                "{place} = rb_funcall({place}, rb_intern(\"{}\"), 1, {})",
                bin.as_symbol(),
                value.text
            )),
            Category::None => Err(self.unsupported(op.as_symbol())),
        }
    }
}
