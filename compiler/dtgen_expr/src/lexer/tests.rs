use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_compound_operators() {
    use TokenKind::*;
    assert_eq!(
        kinds("a += b->r == c"),
        [Ident, PlusAssign, Ident, Arrow, Ident, EqEq, Ident, Eof]
    );
    assert_eq!(kinds("x%=2;!y!=z"), [Ident, PercentAssign, Int, Semi, Bang, Ident, NotEq, Ident, Eof]);
}

#[test]
fn lexes_numbers() {
    use TokenKind::*;
    assert_eq!(kinds("1 2.5 3e4 6e x.r"), [Int, Float, Float, Int, Ident, Ident, Dot, Ident, Eof]);
}

#[test]
fn lexes_c_literal_forms() {
    use TokenKind::*;
    assert_eq!(
        kinds(".5 1.0f 2. 1e-3F 0x10 0XffUL 10u 7L"),
        [Float, Float, Float, Float, Int, Int, Int, Int, Eof]
    );
    let src = "x = .5 + 0x1F;";
    let texts: Vec<&str> = tokenize(src).iter().map(|t| &src[t.span.clone()]).collect();
    assert_eq!(texts, ["x", "=", ".5", "+", "0x1F", ";", ""]);
}

#[test]
fn hex_prefix_without_digits_stays_decimal() {
    use TokenKind::*;
    assert_eq!(kinds("0x"), [Int, Ident, Eof]);
}

#[test]
fn spans_cover_source_text() {
    let src = "abc <= 12.75";
    let tokens = tokenize(src);
    assert_eq!(&src[tokens[0].span.clone()], "abc");
    assert_eq!(&src[tokens[1].span.clone()], "<=");
    assert_eq!(&src[tokens[2].span.clone()], "12.75");
    assert_eq!(tokens[3].span, 12..12);
}

#[test]
fn unknown_bytes_become_other() {
    use TokenKind::*;
    assert_eq!(kinds("a[i, j & k]"), [Ident, LBracket, Ident, Other, Ident, Other, Ident, RBracket, Eof]);
}

#[test]
fn empty_input_is_just_eof() {
    assert_eq!(kinds("   "), [TokenKind::Eof]);
}
