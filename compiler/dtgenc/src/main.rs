//! dtgen CLI
//!
//! Generates the typed kernel sources for a multi-dtype matrix library.

use dtgenc::commands::{
    demangle_symbol, explain_error, list_types, mangle_symbol, parse_generate_options,
    run_generate, show_manifest, show_upcast, take_manifest_flag,
};

fn main() {
    dtgenc::tracing_setup::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "generate" | "gen" => match parse_generate_options(&args[2..]) {
            Ok(options) => run_generate(&options),
            Err(msg) => {
                eprintln!("error: {msg}");
                eprintln!("Usage: dtgen generate [--manifest <file>] [--templates <dir>] [--out <dir>] [--dry-run]");
                std::process::exit(1);
            }
        },
        "types" => {
            let (manifest, _) = take_manifest_flag(&args[2..]);
            list_types(manifest.as_deref());
        }
        "upcast" => {
            let (manifest, rest) = take_manifest_flag(&args[2..]);
            let [a, b] = rest.as_slice() else {
                eprintln!("Usage: dtgen upcast <type> <type> [--manifest <file>]");
                eprintln!("Example: dtgen upcast i32 f64");
                std::process::exit(1);
            };
            show_upcast(a, b, manifest.as_deref());
        }
        "mangle" => {
            let (manifest, rest) = take_manifest_flag(&args[2..]);
            let Some((op, ids)) = rest.split_first() else {
                eprintln!("Usage: dtgen mangle <operation> <type>... [--manifest <file>]");
                eprintln!("Example: dtgen mangle ew_hom i32 f64");
                std::process::exit(1);
            };
            mangle_symbol(op, ids, manifest.as_deref());
        }
        "demangle" => {
            let (manifest, rest) = take_manifest_flag(&args[2..]);
            let [symbol] = rest.as_slice() else {
                eprintln!("Usage: dtgen demangle <symbol> [--manifest <file>]");
                eprintln!("Example: dtgen demangle EwHom_i32_f64");
                std::process::exit(1);
            };
            demangle_symbol(symbol, manifest.as_deref());
        }
        "manifest" => show_manifest(),
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("dtgen {}", env!("CARGO_PKG_VERSION"));
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: dtgen --explain <ERROR_CODE>");
                eprintln!("Example: dtgen --explain E1003");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("dtgen: typed kernel generator");
    println!();
    println!("Usage: dtgen <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate             Generate every artifact the manifest describes");
    println!("  types                List the type registry in order");
    println!("  upcast <a> <b>       Show the promotion result of two types");
    println!("  mangle <op> <t>...   Show the kernel symbol for an operation");
    println!("  demangle <symbol>    Split a kernel symbol into operation and types");
    println!("  manifest             Print the built-in NMatrix manifest as JSON");
    println!("  --explain <code>     Explain a diagnostic code (e.g., E1003)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Generate options:");
    println!("  --manifest, -m <file>   Manifest (default: built-in NMatrix manifest)");
    println!("  --templates, -t <dir>   Template root (default: from the manifest)");
    println!("  --out, -o <dir>         Output directory (default: .)");
    println!("  --dry-run               List artifacts without writing them");
    println!();
    println!("types, upcast, mangle and demangle also accept --manifest <file>.");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=dtgen_template=debug) for tracing output.");
}
