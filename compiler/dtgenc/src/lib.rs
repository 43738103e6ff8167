//! Code generator for the typed kernels of a multi-dtype matrix library.
//!
//! A [`Manifest`] names the type registry, the template blueprints and the
//! dispatch tables. [`generate`] turns it into a set of in-memory
//! [`Artifact`]s:
//!
//! | Artifact | Contents |
//! |----------|----------|
//! | `dtypes.h` | the dtype enum |
//! | `dtypes.c` | sizeof, name and upcast tables |
//! | `dfuncs.c` | element conversion (set) functions |
//! | `kernels.c` / `kernels.h` | instantiated templates and their prototypes |
//! | `dispatch.c` | function-pointer tables keyed by dtype |
//!
//! Nothing is written until the whole run succeeds.

pub mod commands;
mod generator;
pub mod manifest;
mod run;
pub mod tracing_setup;

pub use generator::Generator;
pub use manifest::{Manifest, ManifestError};
pub use run::{generate, Artifact, Generation, GenerationReport, RunError};
