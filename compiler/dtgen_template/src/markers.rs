//! Marker scanning within a single (comment-stripped) line.

use memchr::memmem;

/// Scalar markers of parameter `param`, e.g. `%%TYPE_ABBREV%%` for `ABBREV`.
pub(crate) fn scalar(param: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("%%{param}%%")
    } else {
        format!("%%{param}_{suffix}%%")
    }
}

/// Replaces every `<open><body>%%` span with `f(body)`.
///
/// An opener without a closing `%%` is left in place for the dangling
/// marker check to report.
pub(crate) fn replace_spans<E>(
    line: &str,
    open: &str,
    mut f: impl FnMut(&str) -> Result<String, E>,
) -> Result<String, E> {
    let finder = memmem::Finder::new(open);
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = finder.find(rest.as_bytes()) {
        let body_start = start + open.len();
        let Some(len) = memmem::find(&rest.as_bytes()[body_start..], b"%%") else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&f(&rest[body_start..body_start + len])?);
        rest = &rest[body_start + len + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// The first marker-looking token still present in `line`: `%%` followed
/// by an upper-case letter or `=`.
pub(crate) fn find_dangling(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    memmem::find_iter(bytes, b"%%").find_map(|start| {
        let next = *bytes.get(start + 2)?;
        if !(next.is_ascii_uppercase() || next == b'=') {
            return None;
        }
        let end = memmem::find(&bytes[start + 2..], b"%%")
            .map_or_else(|| token_end(bytes, start + 2), |len| start + 2 + len + 2);
        Some(&line[start..end])
    })
}

fn token_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b.is_ascii_whitespace())
        .map_or(bytes.len(), |len| from + len)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
