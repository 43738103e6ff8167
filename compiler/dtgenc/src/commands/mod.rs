//! Command handlers for the `dtgen` CLI.
//!
//! Each submodule implements one command. Shared helpers for loading the
//! manifest and printing diagnostics live here.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use dtgen_diagnostic::{ColorMode, Diagnostic, TerminalEmitter};

use crate::manifest::Manifest;
use crate::Generator;

mod explain;
mod generate;
mod inspect;

pub use explain::explain_error;
pub use generate::{parse_generate_options, run_generate, GenerateOptions};
pub use inspect::{demangle_symbol, list_types, mangle_symbol, show_manifest, show_upcast};

/// Emitter writing to stderr, colored when stderr is a terminal.
pub(crate) fn stderr_emitter() -> TerminalEmitter<io::Stderr> {
    let stderr = io::stderr();
    let is_tty = stderr.is_terminal();
    TerminalEmitter::with_color_mode(stderr, ColorMode::Auto, is_tty)
}

/// Emit a fatal `diagnostic` followed by the aborted-run summary line.
pub(crate) fn report_failure<W: Write>(
    emitter: &mut TerminalEmitter<W>,
    diagnostic: &Diagnostic,
) -> io::Result<()> {
    emitter.emit(diagnostic)?;
    emitter.emit_summary(1, 0)
}

/// Print `diagnostic` and exit with status 1.
pub(crate) fn fail(diagnostic: &Diagnostic) -> ! {
    let mut emitter = stderr_emitter();
    if report_failure(&mut emitter, diagnostic).is_err() {
        eprintln!("{diagnostic}");
    }
    std::process::exit(1);
}

/// The manifest at `path`, or the built-in one.
pub(crate) fn load_manifest(path: Option<&Path>) -> Manifest {
    match path {
        Some(path) => Manifest::load(path).unwrap_or_else(|err| fail(&err.to_diagnostic())),
        None => Manifest::nmatrix(),
    }
}

pub(crate) fn load_generator(manifest: Option<&str>) -> Generator {
    let manifest = load_manifest(manifest.map(Path::new));
    Generator::from_manifest(&manifest).unwrap_or_else(|err| fail(&err.to_diagnostic()))
}

/// Splits `--manifest <file>` out of `args`, returning it and the rest.
pub fn take_manifest_flag(args: &[String]) -> (Option<String>, Vec<String>) {
    let mut manifest = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--manifest=") {
            manifest = Some(value.to_string());
        } else if arg == "--manifest" {
            manifest = iter.next().cloned();
        } else {
            rest.push(arg.clone());
        }
    }
    (manifest, rest)
}
