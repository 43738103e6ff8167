//! The `generate` command.

use std::path::{Path, PathBuf};

use dtgen_template::FsLoader;

use crate::manifest::Manifest;
use crate::{generate, Generation};

use super::{fail, stderr_emitter};

/// Parsed `generate` flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Manifest file; the built-in NMatrix manifest when absent.
    pub manifest: Option<PathBuf>,
    /// Template root overriding the manifest's `templates`.
    pub templates: Option<PathBuf>,
    pub out: PathBuf,
    /// Report what would be written without touching `out`.
    pub dry_run: bool,
}

impl GenerateOptions {
    /// Template root: the override, else the manifest's `templates`
    /// resolved against the manifest's directory.
    pub fn template_root(&self, manifest: &Manifest) -> PathBuf {
        if let Some(root) = &self.templates {
            return root.clone();
        }
        match self.manifest.as_deref().and_then(Path::parent) {
            Some(dir) => dir.join(&manifest.templates),
            None => manifest.templates.clone(),
        }
    }
}

pub fn parse_generate_options(args: &[String]) -> Result<GenerateOptions, String> {
    let mut options = GenerateOptions {
        out: PathBuf::from("."),
        ..GenerateOptions::default()
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };
        let mut value = |name: &str| {
            inline
                .clone()
                .or_else(|| iter.next().cloned())
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match flag {
            "--manifest" | "-m" => options.manifest = Some(PathBuf::from(value("--manifest")?)),
            "--templates" | "-t" => options.templates = Some(PathBuf::from(value("--templates")?)),
            "--out" | "-o" => options.out = PathBuf::from(value("--out")?),
            "--dry-run" => options.dry_run = true,
            other => return Err(format!("unknown option `{other}`")),
        }
    }
    Ok(options)
}

/// Runs a generation and writes its artifacts. Exits with status 1 on error;
/// nothing is written in that case.
pub fn run_generate(options: &GenerateOptions) {
    let manifest = super::load_manifest(options.manifest.as_deref());
    let root = options.template_root(&manifest);
    tracing::debug!(root = %root.display(), "template root");

    let generation = generate(&manifest, FsLoader::new(root)).unwrap_or_else(|err| fail(&err.to_diagnostic()));
    report_warnings(&generation);

    if options.dry_run {
        for artifact in &generation.artifacts {
            println!(
                "{} ({} bytes)",
                options.out.join(&artifact.name).display(),
                artifact.contents.len()
            );
        }
        return;
    }
    if let Err(err) = generation.write(&options.out) {
        fail(&err.to_diagnostic());
    }

    let report = &generation.report;
    println!(
        "Generated {} files in {} ({} kernels, {} prototypes)",
        generation.artifacts.len(),
        options.out.display(),
        report.instantiations,
        report.prototypes
    );
    for (table, populated) in &report.dispatch {
        println!("  {table}: {populated} entries");
    }
}

fn report_warnings(generation: &Generation) {
    let warnings = &generation.report.warnings;
    if warnings.is_empty() {
        return;
    }
    let mut emitter = stderr_emitter();
    for warning in warnings {
        if emitter.emit(warning).is_err() {
            eprintln!("{warning}");
        }
    }
    // Write failures on stderr have nowhere better to go.
    let _ = emitter.emit_summary(0, warnings.len());
}
