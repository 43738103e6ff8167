//! Generation-time statements: `%%= <expr>%%`.
//!
//! A narrow typed expression language over integers, strings, booleans and
//! type handles. There is no assignment and no access to anything but the
//! bound parameters, so evaluation cannot touch the host.
//!
//! ```text
//! expr    := or ('?' expr ':' expr)?
//! or      := and ('||' and)*
//! and     := cmp ('&&' cmp)*
//! cmp     := sum (cmp_op sum)?
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := ('!' | '-') unary | postfix
//! postfix := primary ('.' ident)*
//! primary := int | string | ident | ident '(' args ')' | '(' expr ')'
//! ```

use std::fmt;

use dtgen_types::{Dtype, Mangler, PromotionLattice, TypeRegistry};

use crate::Binding;

mod parse;

use parse::{Expr, MetaOp};

/// A generation-time value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    Type(Dtype),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Type(_) => "type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MetaError {
    pub message: String,
}

impl MetaError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        MetaError {
            message: message.into(),
        }
    }
}

/// Read-only state a statement may consult.
#[derive(Clone, Copy)]
pub struct MetaContext<'a> {
    pub registry: &'a TypeRegistry,
    pub lattice: &'a PromotionLattice,
    pub mangler: &'a Mangler,
    pub bindings: &'a [Binding],
}

impl MetaContext<'_> {
    /// Evaluates `src` and renders the result as C text.
    pub fn render(&self, src: &str) -> Result<String, MetaError> {
        let value = self.evaluate(src)?;
        Ok(self.display(&value).to_string())
    }

    pub fn evaluate(&self, src: &str) -> Result<Value, MetaError> {
        let expr = parse::parse(src)?;
        self.eval(&expr)
    }

    fn display<'v>(&'v self, value: &'v Value) -> Rendered<'v> {
        Rendered {
            registry: self.registry,
            value,
        }
    }

    fn eval(&self, expr: &Expr) -> Result<Value, MetaError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Ident(name) => self.ident(name),
            Expr::Field(base, field) => {
                let base = self.eval(base)?;
                self.field(&base, field)
            }
            Expr::Call(name, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(name, &args)
            }
            Expr::Not(inner) => match self.eval(inner)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(type_mismatch("!", &other)),
            },
            Expr::Neg(inner) => match self.eval(inner)? {
                Value::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| MetaError::new("integer overflow")),
                other => Err(MetaError::new(format!(
                    "`-` needs an integer, found {}",
                    other.kind()
                ))),
            },
            // Short-circuit: the untaken side is never evaluated.
            Expr::Binary(MetaOp::And, lhs, rhs) => {
                Ok(Value::Bool(self.boolean(lhs, "&&")? && self.boolean(rhs, "&&")?))
            }
            Expr::Binary(MetaOp::Or, lhs, rhs) => {
                Ok(Value::Bool(self.boolean(lhs, "||")? || self.boolean(rhs, "||")?))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.binary(*op, lhs, rhs)
            }
            Expr::Ternary(cond, then, otherwise) => {
                if self.boolean(cond, "?:")? {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
        }
    }

    fn boolean(&self, expr: &Expr, op: &str) -> Result<bool, MetaError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch(op, &other)),
        }
    }

    fn ident(&self, name: &str) -> Result<Value, MetaError> {
        match name {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => self
                .bindings
                .iter()
                .find(|b| b.param == name)
                .map(|b| Value::Type(b.dtype))
                .ok_or_else(|| MetaError::new(format!("unknown name `{name}`"))),
        }
    }

    fn field(&self, base: &Value, field: &str) -> Result<Value, MetaError> {
        let Value::Type(dtype) = base else {
            return Err(MetaError::new(format!(
                "`.{field}` needs a type, found {}",
                base.kind()
            )));
        };
        let desc = self.registry.get(*dtype);
        let value = match field {
            "storage" => Value::Str(desc.storage().to_string()),
            "id" => Value::Str(desc.short_id().to_string()),
            "sym" => Value::Str(desc.sym().to_string()),
            "enum" => Value::Str(desc.enum_tag().to_string()),
            "width" => Value::Int(i64::from(desc.width())),
            "category" => Value::Str(desc.category().name().to_string()),
            "max" => Value::Str(desc.max_macro()),
            "min" => Value::Str(desc.min_macro()),
            "position" => Value::Int(i64::from(dtype.raw())),
            "long" => Value::Type(
                self.registry
                    .widen(*dtype)
                    .map_err(|e| MetaError::new(e.to_string()))?,
            ),
            _ => return Err(MetaError::new(format!("types have no field `{field}`"))),
        };
        Ok(value)
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value, MetaError> {
        match (name, args) {
            ("mangle", [Value::Str(op)]) => {
                let types: Vec<_> = self
                    .bindings
                    .iter()
                    .map(|b| self.registry.get(b.dtype))
                    .collect();
                Ok(Value::Str(self.mangler.mangle(op, &types)))
            }
            ("upcast", [Value::Type(a), Value::Type(b)]) => {
                Ok(Value::Type(self.lattice.result(*a, *b)))
            }
            ("sizeof", [Value::Type(t)]) => {
                Ok(Value::Int(i64::from(self.registry.get(*t).width())))
            }
            ("mangle" | "upcast" | "sizeof", _) => Err(MetaError::new(format!(
                "wrong arguments to `{name}`: ({})",
                args.iter().map(Value::kind).collect::<Vec<_>>().join(", ")
            ))),
            _ => Err(MetaError::new(format!("unknown function `{name}`"))),
        }
    }

    fn binary(&self, op: MetaOp, lhs: Value, rhs: Value) -> Result<Value, MetaError> {
        use Value::{Bool, Int, Str, Type};

        let overflow = || MetaError::new("integer overflow");
        match (op, lhs, rhs) {
            (MetaOp::Eq, a, b) | (MetaOp::Ne, a, b) => {
                let equal = match (&a, &b) {
                    (Int(x), Int(y)) => x == y,
                    (Str(x), Str(y)) => x == y,
                    (Bool(x), Bool(y)) => x == y,
                    (Type(x), Type(y)) => x == y,
                    _ => {
                        return Err(MetaError::new(format!(
                            "cannot compare {} with {}",
                            a.kind(),
                            b.kind()
                        )))
                    }
                };
                Ok(Bool(equal == (op == MetaOp::Eq)))
            }
            (MetaOp::Lt, Int(a), Int(b)) => Ok(Bool(a < b)),
            (MetaOp::Le, Int(a), Int(b)) => Ok(Bool(a <= b)),
            (MetaOp::Gt, Int(a), Int(b)) => Ok(Bool(a > b)),
            (MetaOp::Ge, Int(a), Int(b)) => Ok(Bool(a >= b)),
            (MetaOp::Add, Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or_else(overflow),
            (MetaOp::Sub, Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or_else(overflow),
            (MetaOp::Mul, Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or_else(overflow),
            (MetaOp::Div, Int(_), Int(0)) => Err(MetaError::new("division by zero")),
            (MetaOp::Div, Int(a), Int(b)) => a.checked_div(b).map(Int).ok_or_else(overflow),
            (MetaOp::Add, a @ Str(_), b) | (MetaOp::Add, a, b @ Str(_)) => Ok(Str(format!(
                "{}{}",
                self.display(&a),
                self.display(&b)
            ))),
            (op, a, b) => Err(MetaError::new(format!(
                "`{}` is not defined for {} and {}",
                op.as_symbol(),
                a.kind(),
                b.kind()
            ))),
        }
    }
}

fn type_mismatch(op: &str, found: &Value) -> MetaError {
    MetaError::new(format!("`{op}` needs a boolean, found {}", found.kind()))
}

/// A value as it appears in generated C.
struct Rendered<'a> {
    registry: &'a TypeRegistry,
    value: &'a Value,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            Value::Type(t) => write!(f, "{}", self.registry.get(*t).storage()),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
