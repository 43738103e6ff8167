//! C emission for the fixed generator artifacts.
//!
//! Everything here is a pure function of the type registry (and the
//! promotion lattice and mangler built from it):
//!
//! - [`assign`]: the category-level conversion rules behind every set function
//! - [`tables`]: the dtype enum, sizeof and name tables, the upcast matrix and
//!   per-operation dispatch tables
//! - [`dfuncs`]: set and increment functions with their dispatch matrices
//! - [`file`]: the "do not modify" banner and include guard
//!
//! Output is built in memory through an [`Emitter`] and only written to disk
//! by the caller once a whole artifact is complete.

pub mod assign;
pub mod dfuncs;
mod emitter;
pub mod file;
pub mod tables;

pub use assign::{emit_assign, ConversionRule, UnsupportedConversion};
pub use dfuncs::{DfuncsOutput, SetFunctions};
pub use emitter::{Emitter, StringEmitter};
pub use file::{include_guard, wrap_generated};
pub use tables::{
    decl, dtype_enum, name_table, sizeof_table, upcast_table, DispatchCells, DispatchTable,
};
