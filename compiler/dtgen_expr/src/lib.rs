//! Expression markers: `%%TYPE c = a + b%%` → per-type C statements.
//!
//! # Pipeline
//!
//! ```text
//! marker body ──► lexer ──► parser ──► MarkerBody (ast)
//!                                          │
//!               TypeDescriptor + OperatorTable
//!                                          ▼
//!                                  lower (per category) ──► Translation
//! ```
//!
//! Integer and float types lower to infix C. Complex and rational types go
//! through mangled per-type helpers (`Add2_c64`, `Mul2_r32`, ...). Objects
//! become `rb_funcall` sends.

pub mod ast;
mod error;
mod lexer;
mod lower;
pub mod ops;
mod parser;
mod translate;

pub use error::ExprError;
pub use ops::{OpSet, OperatorTable};
pub use parser::parse;
pub use translate::{Translation, Translator};
