//! Numeric type model for the kernel generator.
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry (ordered TypeDescriptors, positions are Dtype handles)
//!     │
//!     ├──► PromotionLattice (square upcast table keyed by position)
//!     │
//!     └──► Mangler (operation + short ids ──► symbol)
//! ```
//!
//! The registry is built once per generation run and never mutated. Every
//! generated table is keyed by registry position, so insertion order is part
//! of the contract.

mod descriptor;
mod error;
pub mod lattice;
pub mod mangle;
pub mod registry;

pub use descriptor::{Category, Dtype, Storage, TypeDescriptor};
pub use error::TypeError;
pub use lattice::PromotionLattice;
pub use mangle::{camelize, Demangled, Mangler, ERROR_STUB};
pub use registry::{RegistryBuilder, Subset, TypeRegistry};
