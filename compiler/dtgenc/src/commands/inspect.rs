//! Read-only commands: `types`, `upcast`, `mangle`, `demangle`, `manifest`.

use std::fmt::Write as _;

use dtgen_types::{Dtype, TypeRegistry};

use crate::manifest::Manifest;
use crate::Generator;

use super::load_generator;

pub fn list_types(manifest: Option<&str>) {
    let generator = load_generator(manifest);
    print!("{}", types_table(&generator.registry));
}

pub fn show_upcast(a: &str, b: &str, manifest: Option<&str>) {
    let generator = load_generator(manifest);
    match upcast_line(&generator, a, b) {
        Ok(line) => println!("{line}"),
        Err(msg) => exit_with(&msg),
    }
}

pub fn mangle_symbol(op: &str, ids: &[String], manifest: Option<&str>) {
    let generator = load_generator(manifest);
    match mangled(&generator, op, ids) {
        Ok(symbol) => println!("{symbol}"),
        Err(msg) => exit_with(&msg),
    }
}

pub fn demangle_symbol(symbol: &str, manifest: Option<&str>) {
    let generator = load_generator(manifest);
    match demangled(&generator, symbol) {
        Ok(line) => println!("{line}"),
        Err(msg) => exit_with(&msg),
    }
}

/// Prints the built-in manifest, a starting point for custom ones.
pub fn show_manifest() {
    println!("{}", Manifest::nmatrix().to_json_pretty());
}

fn exit_with(msg: &str) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}

/// One row per registry entry, in registry order.
pub fn types_table(registry: &TypeRegistry) -> String {
    let mut out = format!(
        "{:>3}  {:<16} {:<5} {:<12} {:<9} {:>5}  {}\n",
        "pos", "enum", "id", "name", "category", "width", "storage"
    );
    for (dtype, desc) in registry.iter() {
        let _ = writeln!(
            out,
            "{:>3}  {:<16} {:<5} {:<12} {:<9} {:>5}  {}",
            dtype.index(),
            desc.enum_tag(),
            desc.short_id(),
            desc.sym(),
            desc.category().name(),
            desc.width(),
            desc.storage()
        );
    }
    out
}

fn resolve(registry: &TypeRegistry, name: &str) -> Result<Dtype, String> {
    registry
        .lookup(name)
        .ok_or_else(|| format!("unknown type `{name}`"))
}

/// `i32 + f64 -> f64 (NM_FLOAT64)`.
pub fn upcast_line(generator: &Generator, a: &str, b: &str) -> Result<String, String> {
    let registry = &generator.registry;
    let (lhs, rhs) = (resolve(registry, a)?, resolve(registry, b)?);
    let result = registry.get(generator.lattice.result(lhs, rhs));
    let shown = if result.is_sentinel() {
        result.sym()
    } else {
        result.short_id()
    };
    Ok(format!(
        "{} + {} -> {} ({})",
        registry.get(lhs).short_id(),
        registry.get(rhs).short_id(),
        shown,
        result.enum_tag()
    ))
}

pub fn mangled(generator: &Generator, op: &str, ids: &[String]) -> Result<String, String> {
    if ids.is_empty() {
        return Err("mangle needs at least one type".to_string());
    }
    let registry = &generator.registry;
    let types = ids
        .iter()
        .map(|id| resolve(registry, id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(generator.mangler.mangle_dtypes(registry, op, &types))
}

/// `Add2 (c64, c64)`.
pub fn demangled(generator: &Generator, symbol: &str) -> Result<String, String> {
    let registry = &generator.registry;
    let parts = generator
        .mangler
        .demangle(symbol, registry)
        .ok_or_else(|| format!("`{symbol}` is not a kernel symbol"))?;
    let ids: Vec<&str> = parts
        .types
        .iter()
        .map(|&dtype| registry.get(dtype).short_id())
        .collect();
    Ok(format!("{} ({})", parts.operation, ids.join(", ")))
}
