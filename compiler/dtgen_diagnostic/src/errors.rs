//! Embedded error documentation for `dtgen explain`.
//!
//! Each error code has a markdown file in `errors/` that explains the error
//! and how to fix it. They are embedded at compile time.

use crate::ErrorCode;

/// Registry of embedded error documentation.
pub struct ErrorDocs;

impl ErrorDocs {
    /// Get the documentation for an error code.
    pub fn get(code: ErrorCode) -> Option<&'static str> {
        DOCS.iter().find(|(c, _)| *c == code).map(|(_, doc)| *doc)
    }

    /// Get all documented error codes.
    pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
        DOCS.iter().map(|(code, _)| *code)
    }

    pub fn has_docs(code: ErrorCode) -> bool {
        DOCS.iter().any(|(c, _)| *c == code)
    }
}

static DOCS: &[(ErrorCode, &str)] = &[
    (ErrorCode::E1001, include_str!("errors/E1001.md")),
    (ErrorCode::E1002, include_str!("errors/E1002.md")),
    (ErrorCode::E1003, include_str!("errors/E1003.md")),
    (ErrorCode::E1004, include_str!("errors/E1004.md")),
    (ErrorCode::E1005, include_str!("errors/E1005.md")),
    (ErrorCode::E1006, include_str!("errors/E1006.md")),
    (ErrorCode::E2001, include_str!("errors/E2001.md")),
    (ErrorCode::E2002, include_str!("errors/E2002.md")),
    (ErrorCode::E9001, include_str!("errors/E9001.md")),
];

#[cfg(test)]
mod tests;
