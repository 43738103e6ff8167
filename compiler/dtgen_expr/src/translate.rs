//! Marker translation entry points.

use std::fmt;

use dtgen_types::{Dtype, Mangler, TypeRegistry};

use crate::lower::Lowerer;
use crate::{parse, ExprError, OperatorTable};

/// Statements produced for one marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub statements: Vec<String>,
    /// A single predicate, spliced without a trailing `;`.
    pub boolean: bool,
}

impl Translation {
    /// Text that replaces the marker in the template line.
    pub fn render(&self) -> String {
        if self.boolean {
            self.statements.first().cloned().unwrap_or_default()
        } else {
            self.statements.join(";\n") + ";"
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Translates marker bodies against registry types.
#[derive(Clone, Copy)]
pub struct Translator<'a> {
    registry: &'a TypeRegistry,
    mangler: &'a Mangler,
    ops: &'a OperatorTable,
}

impl<'a> Translator<'a> {
    pub fn new(registry: &'a TypeRegistry, mangler: &'a Mangler, ops: &'a OperatorTable) -> Self {
        Translator {
            registry,
            mangler,
            ops,
        }
    }

    /// `%%T <expr>%%`: lower `expr` for `ty`.
    pub fn translate(&self, expr: &str, ty: Dtype) -> Result<Translation, ExprError> {
        self.lower(expr, ty, None)
    }

    /// `%%T_LONG <expr>%%`: lower `expr` for the widened form of `bound`.
    ///
    /// Right-hand places hold `bound` values and are converted first.
    pub fn translate_widened(&self, expr: &str, bound: Dtype) -> Result<Translation, ExprError> {
        let widened = self.registry.widen(bound).map_err(|_| {
            let desc = self.registry.get(bound);
            ExprError::UnsupportedOperation {
                op: "widen".to_string(),
                sym: desc.sym().to_string(),
                category: desc.category(),
            }
        })?;
        self.lower(expr, widened, Some(bound))
    }

    fn lower(&self, expr: &str, ty: Dtype, source: Option<Dtype>) -> Result<Translation, ExprError> {
        let target = self.registry.get(ty);
        if target.is_sentinel() {
            return Err(ExprError::UnsupportedOperation {
                op: expr.trim().to_string(),
                sym: target.sym().to_string(),
                category: target.category(),
            });
        }
        let body = parse(expr)?;
        let lowerer = Lowerer {
            target,
            source: source.map(|s| self.registry.get(s)),
            mangler: self.mangler,
            ops: self.ops,
        };
        let statements = lowerer.body(&body)?;
        tracing::trace!(expr, ty = target.sym(), ?statements, "translated marker");
        Ok(Translation {
            statements,
            boolean: body.is_boolean(),
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
