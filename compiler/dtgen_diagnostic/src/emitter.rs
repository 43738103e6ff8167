//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.

use std::io::{self, Write};

use crate::{Diagnostic, Severity};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    /// Emit one diagnostic followed by a blank line.
    pub fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        let color = match diagnostic.severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        };
        self.write_colored(&diagnostic.severity.to_string(), color)?;
        self.write_colored(&format!("[{}]", diagnostic.code), color)?;
        writeln!(self.writer, ": {}", diagnostic.message)?;

        if let Some(location) = &diagnostic.location {
            write!(self.writer, "  --> ")?;
            self.write_colored(&location.to_string(), colors::BOLD)?;
            writeln!(self.writer)?;
        }

        for note in &diagnostic.notes {
            write!(self.writer, "  = ")?;
            self.write_colored("note", colors::BOLD)?;
            writeln!(self.writer, ": {note}")?;
        }

        writeln!(self.writer)
    }

    /// Emit a closing summary line such as `2 warnings emitted`.
    pub fn emit_summary(&mut self, error_count: usize, warning_count: usize) -> io::Result<()> {
        if error_count > 0 {
            self.write_colored("error", colors::ERROR)?;
            writeln!(
                self.writer,
                ": generation aborted due to {error_count} error{}",
                plural_s(error_count)
            )?;
        } else if warning_count > 0 {
            self.write_colored("warning", colors::WARNING)?;
            writeln!(
                self.writer,
                ": {warning_count} warning{} emitted",
                plural_s(warning_count)
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, text: &str, color: &str) -> io::Result<()> {
        if self.colors {
            write!(self.writer, "{color}{text}{}", colors::RESET)
        } else {
            write!(self.writer, "{text}")
        }
    }
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests;
