//! Immutable state shared by one generation run.

use dtgen_expr::OperatorTable;
use dtgen_template::TemplateEngine;
use dtgen_types::{Mangler, PromotionLattice, TypeRegistry};

use crate::manifest::{Manifest, ManifestError};

/// Registry, lattice, mangler and operator table, built once per run.
#[derive(Debug)]
pub struct Generator {
    pub registry: TypeRegistry,
    pub lattice: PromotionLattice,
    pub mangler: Mangler,
    pub ops: OperatorTable,
}

impl Generator {
    /// Builds and validates everything `manifest` describes.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, ManifestError> {
        let registry = manifest.build_registry()?;
        manifest.validate(&registry)?;
        let lattice = PromotionLattice::build(&registry);
        Ok(Generator {
            lattice,
            mangler: Mangler::with_error_stub(manifest.error_stub.as_str()),
            ops: manifest.operator_table()?,
            registry,
        })
    }

    /// The NMatrix registry with no operator restrictions.
    pub fn nmatrix() -> Self {
        let registry = TypeRegistry::nmatrix();
        Generator {
            lattice: PromotionLattice::build(&registry),
            mangler: Mangler::new(),
            ops: OperatorTable::permissive(),
            registry,
        }
    }

    pub fn engine(&self) -> TemplateEngine<'_> {
        TemplateEngine::new(&self.registry, &self.lattice, &self.mangler, &self.ops)
    }
}
