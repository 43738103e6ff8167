use dtgen_diagnostic::{Diagnostic, ErrorCode};
use dtgen_types::Category;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    /// The marker body does not parse.
    #[error("malformed expression `{expr}`: {message}")]
    Malformed { expr: String, message: String },

    /// The category has no lowering for the operator.
    #[error("`{op}` is not supported for {category} type `{sym}`")]
    UnsupportedOperation {
        op: String,
        sym: String,
        category: Category,
    },

    /// The operator exists but no blueprint enables it for the category.
    #[error("`{op}` is not enabled for {category} types")]
    DisabledOperator { op: String, category: Category },
}

impl ExprError {
    pub(crate) fn malformed(expr: &str, message: impl Into<String>) -> Self {
        ExprError::Malformed {
            expr: expr.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ExprError::Malformed { .. } => ErrorCode::E1006,
            ExprError::UnsupportedOperation { .. } | ExprError::DisabledOperator { .. } => {
                ErrorCode::E1002
            }
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            ExprError::DisabledOperator { .. } => {
                diag.with_note("list the operator in the blueprint's `ops`")
            }
            _ => diag,
        }
    }
}
