//! Generated-file framing.

/// `kernels.h` → `KERNELS_H`, `gen/my-kernels.h` → `GEN_MY_KERNELS_H`.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, so the guard is always a
/// valid C identifier.
pub fn include_guard(file_name: &str) -> String {
    let mut guard: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if guard.is_empty() || guard.starts_with(|c: char| c.is_ascii_digit()) {
        guard.insert_str(0, "DTGEN_");
    }
    guard
}

/// Wrap `body` in the "do not modify" banner and an include guard.
pub fn wrap_generated(file_name: &str, body: &str) -> String {
    let guard = include_guard(file_name);
    let mut out = format!(
        "/* Automatically created by dtgen - do not modify! */\n#ifndef {guard}\n# define {guard}\n\n"
    );
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("\n#endif\n\n");
    out
}
