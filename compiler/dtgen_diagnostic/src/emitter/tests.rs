use super::*;
use crate::{ErrorCode, Location};
use pretty_assertions::assert_eq;

fn render(diagnostic: &Diagnostic, mode: ColorMode) -> String {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), mode, false);
    emitter.emit(diagnostic).unwrap();
    String::from_utf8(emitter.into_inner()).unwrap()
}

#[test]
fn plain_output_has_no_escape_codes() {
    let diag = Diagnostic::warning(ErrorCode::E1001)
        .with_message("cannot assign complex64 to rational32")
        .with_location(Location::new("dfuncs.c", 1));
    let out = render(&diag, ColorMode::Never);
    assert_eq!(
        out,
        "warning[E1001]: cannot assign complex64 to rational32\n  --> dfuncs.c:1\n\n"
    );
}

#[test]
fn colored_output_wraps_severity() {
    let diag = Diagnostic::error(ErrorCode::E1002).with_message("boom");
    let out = render(&diag, ColorMode::Always);
    assert!(out.starts_with("\x1b[1;31merror\x1b[0m"));
    assert!(out.contains("boom"));
}

#[test]
fn auto_mode_follows_tty() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
}

#[test]
fn summary_pluralizes() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.emit_summary(0, 2).unwrap();
    emitter.emit_summary(1, 0).unwrap();
    let out = String::from_utf8(emitter.into_inner()).unwrap();
    assert_eq!(
        out,
        "warning: 2 warnings emitted\nerror: generation aborted due to 1 error\n"
    );
}
