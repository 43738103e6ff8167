//! A generation run: every artifact assembled in memory, then written.

use std::fs;
use std::path::{Path, PathBuf};

use dtgen_diagnostic::{Diagnostic, ErrorCode};
use dtgen_emit::{
    dtype_enum, name_table, sizeof_table, upcast_table, wrap_generated,
    DispatchTable, Emitter, SetFunctions,
};
use dtgen_template::{
    ExpansionOutput, ExpansionRequest, Expander, ParamGroup, TemplateError, TemplateLoader,
};

use crate::manifest::{Manifest, ManifestError};
use crate::Generator;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("cannot write `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RunError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RunError::Manifest(err) => err.code(),
            RunError::Template(err) => err.code(),
            RunError::Io { .. } => ErrorCode::E9001,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RunError::Manifest(err) => err.to_diagnostic(),
            RunError::Template(err) => err.to_diagnostic(),
            RunError::Io { .. } => Diagnostic::error(self.code()).with_message(self.to_string()),
        }
    }
}

/// One output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub contents: String,
}

/// What a run produced besides its artifacts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Non-fatal diagnostics, in the order they were raised.
    pub warnings: Vec<Diagnostic>,
    pub instantiations: usize,
    pub prototypes: usize,
    /// Populated cells per dispatch table.
    pub dispatch: Vec<(String, usize)>,
}

#[derive(Clone, Debug)]
pub struct Generation {
    pub artifacts: Vec<Artifact>,
    pub report: GenerationReport,
}

impl Generation {
    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    /// Writes every artifact into `out_dir`, creating it if needed.
    pub fn write(&self, out_dir: &Path) -> Result<(), RunError> {
        let io = |path: &Path| {
            let path = path.to_path_buf();
            move |source| RunError::Io { path, source }
        };
        fs::create_dir_all(out_dir).map_err(io(out_dir))?;
        for artifact in &self.artifacts {
            let path = out_dir.join(&artifact.name);
            fs::write(&path, &artifact.contents).map_err(io(&path))?;
            tracing::debug!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
        }
        Ok(())
    }
}

/// Produces every artifact `manifest` describes. Nothing touches the file
/// system except template loading.
#[tracing::instrument(level = "info", skip_all, fields(blueprints = manifest.blueprints.len()))]
pub fn generate<L: TemplateLoader>(manifest: &Manifest, loader: L) -> Result<Generation, RunError> {
    let generator = Generator::from_manifest(manifest)?;
    let Generator {
        registry,
        lattice,
        mangler,
        ..
    } = &generator;
    let names = &manifest.artifacts;
    let mut report = GenerationReport::default();
    let mut artifacts = Vec::new();

    artifacts.push(Artifact {
        name: names.enum_header.clone(),
        contents: wrap_generated(&names.enum_header, &dtype_enum(registry, &manifest.enum_name)),
    });

    let tables = format!(
        "#include \"{}\"\n\n{}{}{}",
        names.enum_header,
        sizeof_table(registry),
        name_table(registry),
        upcast_table(registry, lattice)
    );
    artifacts.push(Artifact {
        name: names.tables.clone(),
        contents: wrap_generated(&names.tables, &tables),
    });

    let dfuncs = SetFunctions::new(registry, mangler)
        .with_includes(manifest.includes.clone())
        .generate();
    report
        .warnings
        .extend(dfuncs.omitted.iter().map(|omitted| omitted.to_diagnostic()));
    artifacts.push(Artifact {
        name: names.dfuncs.clone(),
        contents: wrap_generated(&names.dfuncs, &dfuncs.text),
    });

    let kernels = expand_blueprints(manifest, &generator, loader)?;
    report.instantiations = kernels.instantiations;
    report.prototypes = kernels.prototypes.len();
    report.warnings.extend(kernels.warnings);
    let header_name = &manifest.output.header;
    let mut header = kernels.prototypes.join("\n");
    header.push('\n');
    artifacts.push(Artifact {
        name: manifest.output.source.clone(),
        contents: kernels.text.output(),
    });
    artifacts.push(Artifact {
        name: header_name.clone(),
        contents: wrap_generated(header_name, &header),
    });

    let mut dispatch = format!("#include \"{header_name}\"\n\n");
    for request in &manifest.dispatch {
        let groups = manifest.dispatch_groups(registry, request)?;
        let c_type = request.c_type();
        let table = match groups.as_slice() {
            [rows, cols] => DispatchTable::binary(
                &request.name,
                &c_type,
                registry,
                mangler,
                &request.operation,
                rows,
                cols,
            ),
            [group, ..] => DispatchTable::unary(
                &request.name,
                &c_type,
                registry,
                mangler,
                &request.operation,
                group,
            ),
            // `dispatch_groups` rejects zero axes.
            [] => continue,
        };
        tracing::debug!(table = %request.name, populated = table.populated(), "dispatch table");
        report.dispatch.push((request.name.clone(), table.populated()));
        dispatch.push_str(&table.render());
    }
    artifacts.push(Artifact {
        name: names.dispatch.clone(),
        contents: wrap_generated(&names.dispatch, &dispatch),
    });

    tracing::info!(
        instantiations = report.instantiations,
        prototypes = report.prototypes,
        warnings = report.warnings.len(),
        "generation finished"
    );
    Ok(Generation { artifacts, report })
}

/// The templated source: boilerplate, then every blueprint's source sets in
/// declaration order.
fn expand_blueprints<L: TemplateLoader>(
    manifest: &Manifest,
    generator: &Generator,
    loader: L,
) -> Result<ExpansionOutput, RunError> {
    let mut out = ExpansionOutput::new();
    let expander = Expander::new(generator.engine(), loader);

    if let Some(name) = &manifest.output.boilerplate {
        let boilerplate = expander.loader().load("", name)?;
        out.text.emit(boilerplate.text());
        out.text.ensure_trailing_newline();
    }

    for blueprint in &manifest.blueprints {
        let own = manifest.blueprint_types(&generator.registry, blueprint)?;
        for source in &blueprint.sources {
            let mut groups = vec![ParamGroup::new(blueprint.param.as_str(), own.clone())];
            for (param, base) in &source.with {
                let types = match manifest.blueprint(*base) {
                    Some(other) => manifest.blueprint_types(&generator.registry, other)?,
                    None => Vec::new(),
                };
                groups.push(ParamGroup::new(param.as_str(), types));
            }
            let request = ExpansionRequest {
                base: blueprint.base.name().to_string(),
                names: source.names.clone(),
                groups,
            };
            expander.expand(&request, &mut out)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
