//! Symbol mangling for generated kernels.
//!
//! # Mangling Scheme
//!
//! ```text
//! <Operation>_<id>[_<id>]
//! ```
//!
//! Where:
//! - `<Operation>` is the operation name camel-cased (`ew_hom` → `EwHom`)
//! - each `<id>` is a type's short id, in call order
//!
//! Any sentinel operand collapses the whole symbol to the shared error stub,
//! so dispatch tables can route invalid combinations to one function.
//!
//! | Operation | Types | Symbol |
//! |-----------|-------|--------|
//! | `set` | `i32`, `f64` | `Set_i32_f64` |
//! | `add2` | `c64` | `Add2_c64` |
//! | `ew_hom` | `r64`, `i8` | `EwHom_r64_i8` |
//! | `set` | `none`, `f64` | `TypeErr` |
//!
//! Short ids are ASCII alphanumerics and camel-cased operations contain no
//! `_`, so splitting on `_` recovers every component.

use crate::{Dtype, TypeDescriptor, TypeRegistry};

/// Default name of the runtime type-error function.
pub const ERROR_STUB: &str = "TypeErr";

/// Separator between the operation and each short id.
const SEP: char = '_';

/// Upper-case the first letter of every `_`-separated segment and join them.
pub fn camelize(op: &str) -> String {
    let mut out = String::with_capacity(op.len());
    for segment in op.split(SEP) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mangler {
    error_stub: String,
}

impl Default for Mangler {
    fn default() -> Self {
        Mangler {
            error_stub: ERROR_STUB.to_string(),
        }
    }
}

impl Mangler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_error_stub(stub: impl Into<String>) -> Self {
        Mangler {
            error_stub: stub.into(),
        }
    }

    pub fn error_stub(&self) -> &str {
        &self.error_stub
    }

    pub fn mangle(&self, op: &str, types: &[&TypeDescriptor]) -> String {
        if types.iter().any(|t| t.is_sentinel()) {
            return self.error_stub.clone();
        }
        let mut symbol = camelize(op);
        for t in types {
            symbol.push(SEP);
            symbol.push_str(t.short_id());
        }
        symbol
    }

    /// [`mangle`](Self::mangle) over registry handles.
    pub fn mangle_dtypes(&self, registry: &TypeRegistry, op: &str, types: &[Dtype]) -> String {
        let descs: Vec<&TypeDescriptor> = types.iter().map(|&t| registry.get(t)).collect();
        self.mangle(op, &descs)
    }

    /// Split a mangled symbol back into its operation and types.
    ///
    /// The error stub and symbols with unknown ids yield `None`.
    pub fn demangle(&self, symbol: &str, registry: &TypeRegistry) -> Option<Demangled> {
        if symbol == self.error_stub {
            return None;
        }
        let mut parts = symbol.split(SEP);
        let operation = parts.next().filter(|op| !op.is_empty())?;
        let types = parts
            .map(|id| registry.by_short_id(id))
            .collect::<Option<Vec<_>>>()?;
        if types.is_empty() {
            return None;
        }
        Some(Demangled {
            operation: operation.to_string(),
            types,
        })
    }
}

/// A symbol taken apart by [`Mangler::demangle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demangled {
    /// Camel-cased operation, as it appears in the symbol.
    pub operation: String,
    pub types: Vec<Dtype>,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
