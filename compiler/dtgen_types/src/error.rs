//! Registry construction and lookup errors.

use dtgen_diagnostic::{Diagnostic, ErrorCode};

use crate::Category;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// Position 0 must hold the `None` sentinel.
    #[error("the first registry entry must be a `none` sentinel")]
    MissingNoneSentinel,

    /// `Dtype` positions are stored in a `u8`.
    #[error("registry holds {count} types, at most 255 are supported")]
    TooManyTypes { count: usize },

    #[error("duplicate enum tag `{tag}`")]
    DuplicateEnumTag { tag: String },

    #[error("duplicate short id `{id}`")]
    DuplicateShortId { id: String },

    /// Short ids appear inside mangled names, separated by `_`.
    #[error("short id `{id}` of `{tag}` must be non-empty ASCII alphanumerics")]
    InvalidShortId { tag: String, id: String },

    #[error("enum tag `{tag}` is not a valid C identifier")]
    InvalidEnumTag { tag: String },

    /// Only the final entry may be a second sentinel.
    #[error("sentinel `{tag}` may only appear first or last")]
    CountSentinelNotLast { tag: String },

    #[error("unknown type or subset `{name}`")]
    UnknownType { name: String },

    /// Raised by `widen` for sentinel categories.
    #[error("type `{sym}` of category `{category}` has no widened form")]
    NoWidenedType { sym: String, category: Category },
}

impl TypeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TypeError::NoWidenedType { .. } => ErrorCode::E1002,
            _ => ErrorCode::E2002,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            TypeError::InvalidShortId { .. } => {
                diag.with_note("mangled names join short ids with `_`")
            }
            TypeError::UnknownType { .. } => diag.with_note(
                "subsets: all, index, integer, rational, non_blas, complex, float, object, actual, long",
            ),
            _ => diag,
        }
    }
}
