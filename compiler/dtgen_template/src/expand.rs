//! Combinatorial expansion of template names over type groups.

use std::fs;
use std::path::PathBuf;

use dtgen_diagnostic::Diagnostic;
use dtgen_emit::{Emitter, StringEmitter};
use dtgen_types::Dtype;
use rustc_hash::FxHashMap;

use crate::{Binding, Template, TemplateEngine, TemplateError};

/// Extension of template files.
pub const TEMPLATE_EXT: &str = ".template.c";

/// Finds template sources by name.
pub trait TemplateLoader {
    /// Loads `name` for blueprint `base`.
    fn load(&self, base: &str, name: &str) -> Result<Template, TemplateError>;
}

impl<T: TemplateLoader + ?Sized> TemplateLoader for &T {
    fn load(&self, base: &str, name: &str) -> Result<Template, TemplateError> {
        (**self).load(base, name)
    }
}

/// Loads `<root>/<base>/<name>.template.c`, falling back to
/// `<root>/<name>.template.c`.
#[derive(Clone, Debug)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsLoader { root: root.into() }
    }

    fn candidates(&self, base: &str, name: &str) -> [PathBuf; 2] {
        let file = format!("{name}{TEMPLATE_EXT}");
        [self.root.join(base).join(&file), self.root.join(file)]
    }
}

impl TemplateLoader for FsLoader {
    fn load(&self, base: &str, name: &str) -> Result<Template, TemplateError> {
        let candidates = self.candidates(base, name);
        for path in &candidates {
            if path.is_file() {
                let text = fs::read_to_string(path).map_err(|source| TemplateError::Io {
                    path: path.clone(),
                    source,
                })?;
                tracing::trace!(path = %path.display(), "loaded template");
                return Ok(Template::new(path.clone(), text));
            }
        }
        Err(TemplateError::NotFound {
            name: name.to_string(),
            searched: candidates.to_vec(),
        })
    }
}

/// Templates held in memory, keyed by `base/name` or plain `name`.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    sources: FxHashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(key.into(), text.into());
        self
    }
}

impl TemplateLoader for MemoryLoader {
    fn load(&self, base: &str, name: &str) -> Result<Template, TemplateError> {
        let scoped = format!("{base}/{name}");
        let found = [scoped.as_str(), name].into_iter().find_map(|key| {
            self.sources
                .get(key)
                .map(|text| Template::new(format!("{key}{TEMPLATE_EXT}"), text.as_str()))
        });
        found.ok_or_else(|| TemplateError::NotFound {
            name: name.to_string(),
            searched: vec![PathBuf::from(&scoped), PathBuf::from(name)],
        })
    }
}

/// A parameter and the types it ranges over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamGroup {
    pub param: String,
    pub types: Vec<Dtype>,
}

impl ParamGroup {
    pub fn new(param: impl Into<String>, types: Vec<Dtype>) -> Self {
        ParamGroup {
            param: param.into(),
            types,
        }
    }
}

/// `names × groups[0] × groups[1] × ...`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionRequest {
    pub base: String,
    pub names: Vec<String>,
    pub groups: Vec<ParamGroup>,
}

impl ExpansionRequest {
    /// Every binding set, first group outermost.
    pub fn combinations(&self) -> Vec<Vec<Binding>> {
        let mut combos = vec![Vec::new()];
        for group in &self.groups {
            combos = combos
                .into_iter()
                .flat_map(|prefix| {
                    group.types.iter().map(move |&dtype| {
                        let mut bindings = prefix.clone();
                        bindings.push(Binding::new(group.param.as_str(), dtype));
                        bindings
                    })
                })
                .collect();
        }
        combos
    }
}

/// Accumulated output of a sequence of expansions.
#[derive(Debug, Default)]
pub struct ExpansionOutput {
    pub text: StringEmitter,
    pub prototypes: Vec<String>,
    pub warnings: Vec<Diagnostic>,
    pub instantiations: usize,
}

impl ExpansionOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Expands requests through a loader and an engine.
pub struct Expander<'e, L> {
    engine: TemplateEngine<'e>,
    loader: L,
}

impl<'e, L: TemplateLoader> Expander<'e, L> {
    pub fn new(engine: TemplateEngine<'e>, loader: L) -> Self {
        Expander { engine, loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Appends every instantiation of `request` to `out`; names vary fastest.
    #[tracing::instrument(level = "debug", skip_all, fields(base = %request.base, names = ?request.names))]
    pub fn expand(
        &self,
        request: &ExpansionRequest,
        out: &mut ExpansionOutput,
    ) -> Result<(), TemplateError> {
        let templates = request
            .names
            .iter()
            .map(|name| self.loader.load(&request.base, name))
            .collect::<Result<Vec<_>, _>>()?;

        for bindings in request.combinations() {
            for template in &templates {
                let inst = self.engine.instantiate(template, &bindings)?;
                out.text.emit(&inst.text);
                out.prototypes.extend(inst.prototypes);
                out.warnings.extend(inst.warnings);
                out.instantiations += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
