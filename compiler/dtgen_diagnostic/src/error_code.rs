//! Error codes for all generator diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1002`) used for
//! `dtgen explain` lookups and documentation.

use std::fmt;

/// Error codes for all generator diagnostics.
///
/// Format: E#### where the first digit indicates the layer:
/// - E1xxx: Template expansion (conversions, expressions, markers, declarations)
/// - E2xxx: Configuration (manifest, registry)
/// - E9xxx: Environment (I/O)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Template expansion (E1xxx)
    /// Conversion between two categories is not supported (warning)
    E1001,
    /// Operation not supported for a type
    E1002,
    /// Marker left unresolved after substitution
    E1003,
    /// Harvested declaration could not be reduced to a prototype (warning)
    E1004,
    /// Generation-time statement failed to evaluate
    E1005,
    /// Malformed expression marker
    E1006,

    // Configuration (E2xxx)
    /// Invalid manifest
    E2001,
    /// Invalid type registry
    E2002,

    // Environment (E9xxx)
    /// File system error
    E9001,
}

impl ErrorCode {
    /// All known codes, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line summary of the code.
    pub fn summary(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unsupported conversion",
            ErrorCode::E1002 => "unsupported operation",
            ErrorCode::E1003 => "dangling marker",
            ErrorCode::E1004 => "malformed declaration",
            ErrorCode::E1005 => "generation-time statement failed",
            ErrorCode::E1006 => "malformed expression",
            ErrorCode::E2001 => "invalid manifest",
            ErrorCode::E2002 => "invalid type registry",
            ErrorCode::E9001 => "file system error",
        }
    }

    /// Codes that never abort a run.
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E1004)
    }

    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
                | ErrorCode::E1006
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, ErrorCode::E2001 | ErrorCode::E2002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or(())
    }
}
