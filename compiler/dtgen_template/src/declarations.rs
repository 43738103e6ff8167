//! Harvesting function prototypes from expanded C.
//!
//! The harvester sees the comment-free code of every output line. While the
//! brace depth is zero it accumulates candidate declaration text; when a
//! body opens right after a complete parameter list, the accumulated text
//! is the function's signature.

use dtgen_diagnostic::{Diagnostic, ErrorCode};

/// Why a harvested signature produced no prototype.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Omitted {
    /// `static` functions are private to the generated source.
    #[error("`{0}` has internal linkage")]
    InternalLinkage(String),

    #[error("cannot reduce `{raw}` to a prototype: {reason}")]
    Malformed { raw: String, reason: &'static str },
}

impl Omitted {
    /// Only malformed signatures are worth reporting.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Omitted::InternalLinkage(_) => None,
            Omitted::Malformed { .. } => {
                Some(Diagnostic::warning(ErrorCode::E1004).with_message(self.to_string()))
            }
        }
    }
}

#[derive(Default, Debug)]
pub struct DeclarationHarvester {
    depth: usize,
    buffer: String,
    captured: Vec<String>,
}

impl DeclarationHarvester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the code portion of one line.
    pub fn feed(&mut self, code: &str) {
        let (opens, closes) = count_braces(code);

        if self.depth == 0 {
            let head = code.split('{').next().unwrap_or_default();
            if code.contains(';') && opens == 0 || code.trim_start().starts_with('#') {
                self.buffer.clear();
            } else {
                let head = head.trim();
                if !head.is_empty() {
                    if !self.buffer.is_empty() {
                        self.buffer.push(' ');
                    }
                    self.buffer.push_str(head);
                }
            }
            if opens > 0 {
                if is_complete(&self.buffer) {
                    self.captured.push(std::mem::take(&mut self.buffer));
                }
                // Struct and initializer bodies never name a function.
                self.buffer.clear();
            }
        }

        self.depth = (self.depth + opens).saturating_sub(closes);
    }

    /// Raw signatures captured so far, in source order.
    pub fn captured(&self) -> &[String] {
        &self.captured
    }

    pub fn into_captured(self) -> Vec<String> {
        self.captured
    }
}

/// The buffer names a complete parameter list.
fn is_complete(text: &str) -> bool {
    let open = text.matches('(').count();
    open > 0 && open == text.matches(')').count()
}

/// Braces outside string and character literals.
fn count_braces(code: &str) -> (usize, usize) {
    let mut opens = 0;
    let mut closes = 0;
    let mut quote = None;
    let mut escaped = false;
    for c in code.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '{' => opens += 1,
                '}' => closes += 1,
                _ => {}
            },
        }
    }
    (opens, closes)
}

/// Reduces a harvested signature to a header prototype.
///
/// ```text
/// int Foo(int x, char* y[])   →   int Foo(int,char*[]);
/// ```
pub fn reduce_to_prototype(raw: &str) -> Result<String, Omitted> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.contains(&"static") {
        return Err(Omitted::InternalLinkage(raw.trim().to_string()));
    }
    let text = words
        .into_iter()
        .filter(|w| *w != "inline")
        .collect::<Vec<_>>()
        .join(" ");

    let malformed = |reason| Omitted::Malformed {
        raw: raw.trim().to_string(),
        reason,
    };
    let open = text.find('(').ok_or_else(|| malformed("no parameter list"))?;
    let close = matching_paren(&text, open).ok_or_else(|| malformed("unbalanced parentheses"))?;
    let head = text[..open].trim_end();
    if head.is_empty() {
        return Err(malformed("no function name"));
    }

    let params: Vec<String> = split_params(&text[open + 1..close])
        .into_iter()
        .map(strip_param_name)
        .collect();
    Ok(format!("{head}({});", params.join(",")))
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits at commas outside nested parentheses and brackets.
fn split_params(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(list[start..].trim());
    params
}

/// `int x` → `int`, `char *p` → `char *`, `double a[]` → `double[]`.
fn strip_param_name(param: &str) -> String {
    let param = param.trim();
    // `void`, `...` or an unnamed `size_t`.
    if !param.contains(|c: char| c.is_whitespace() || c == '*') {
        return param.to_string();
    }

    let (decl, suffix) = match param.find('[') {
        Some(at) => (param[..at].trim_end(), &param[at..]),
        None => (param, ""),
    };
    let name_start = decl
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(0, |i| i + 1);
    let ty = decl[..name_start].trim_end();
    if ty.is_empty() {
        return param.to_string();
    }
    format!("{ty}{suffix}")
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
