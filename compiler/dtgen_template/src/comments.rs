//! C comment stripping, one line at a time.
//!
//! The scanner carries block-comment state across lines. Comment markers
//! inside string and character literals are left alone. A line that lies
//! entirely inside a block comment strips to the empty string, so output
//! line numbers stay aligned with the template.

#[derive(Default, Debug)]
pub struct CommentScanner {
    in_block: bool,
}

impl CommentScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last line ended inside a `/* ... */` comment.
    pub fn in_block_comment(&self) -> bool {
        self.in_block
    }

    /// The code portion of `line`.
    pub fn strip(&mut self, line: &str) -> String {
        let bytes = line.as_bytes();
        let mut out = String::with_capacity(line.len());
        let mut copied_from = 0;
        let mut i = 0;

        while i < bytes.len() {
            if self.in_block {
                match memchr::memmem::find(&bytes[i..], b"*/") {
                    Some(offset) => {
                        self.in_block = false;
                        i += offset + 2;
                        copied_from = i;
                    }
                    None => return out,
                }
                continue;
            }
            match bytes[i] {
                quote @ (b'"' | b'\'') => i = skip_literal(bytes, i, quote),
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    out.push_str(&line[copied_from..i]);
                    self.in_block = true;
                    i += 2;
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    out.push_str(&line[copied_from..i]);
                    return out;
                }
                _ => i += 1,
            }
        }
        if !self.in_block {
            out.push_str(&line[copied_from..]);
        }
        out
    }
}

/// Index just past the literal opened at `start` (or the end of the line).
fn skip_literal(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
