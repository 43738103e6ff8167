//! Diagnostic system for generator error reporting.
//!
//! Every failure the generator can hit maps to a [`Diagnostic`]:
//! - an error code for searchability (`dtgen explain E1002`)
//! - a clear message (what went wrong)
//! - an optional template location (where it went wrong)
//! - notes (context)
//!
//! Fatal diagnostics abort the generation run. Warnings are collected in the
//! run report and the run continues.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;

pub use diagnostic::{Diagnostic, Location, Severity};
pub use emitter::{ColorMode, TerminalEmitter};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
