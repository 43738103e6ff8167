use std::io;
use std::path::PathBuf;

use dtgen_diagnostic::{Diagnostic, ErrorCode, Location};
use dtgen_expr::ExprError;

use crate::MetaError;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A `%%...` token survived every substitution pass.
    #[error("unresolved marker `{marker}`")]
    DanglingMarker { marker: String, location: Location },

    #[error("{source}")]
    Expression {
        source: ExprError,
        location: Location,
    },

    #[error("cannot evaluate `%%={statement}%%`: {source}")]
    Meta {
        statement: String,
        source: MetaError,
        location: Location,
    },

    #[error("template `{name}` not found")]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("cannot read `{}`: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl TemplateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TemplateError::DanglingMarker { .. } => ErrorCode::E1003,
            TemplateError::Expression { source, .. } => source.code(),
            TemplateError::Meta { .. } => ErrorCode::E1005,
            TemplateError::NotFound { .. } | TemplateError::Io { .. } => ErrorCode::E9001,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            TemplateError::DanglingMarker { location, .. }
            | TemplateError::Expression { location, .. }
            | TemplateError::Meta { location, .. } => Some(location),
            TemplateError::NotFound { .. } | TemplateError::Io { .. } => None,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = match self {
            TemplateError::Expression { source, .. } => source.to_diagnostic(),
            _ => Diagnostic::error(self.code()).with_message(self.to_string()),
        };
        if let Some(location) = self.location() {
            diag = diag.with_location(location.clone());
        }
        match self {
            TemplateError::DanglingMarker { .. } => {
                diag.with_note("markers are `%%P%%`, `%%P_ABBREV%%`, `%%P_MAX%%`, `%%P_LONG%%`, `%%P <expr>%%` or `%%= <stmt>%%` for a bound parameter `P`")
            }
            TemplateError::NotFound { searched, .. } => searched.iter().fold(diag, |diag, path| {
                diag.with_note(format!("looked for {}", path.display()))
            }),
            _ => diag,
        }
    }
}
