//! The `explain` command: documentation for diagnostic codes.

use dtgen_diagnostic::{ErrorCode, ErrorDocs};

pub fn explain_error(code_str: &str) {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!(
            "Known codes: {}",
            ErrorDocs::all_codes()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        std::process::exit(1);
    };

    match ErrorDocs::get(code) {
        Some(doc) => println!("{doc}"),
        None => {
            println!("{code}: {}", code.summary());
        }
    }
}
