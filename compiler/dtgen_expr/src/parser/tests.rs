use pretty_assertions::assert_eq;

use super::*;

fn place(text: &str) -> Expr {
    Expr::Place(Place(text.to_string()))
}

fn int(text: &str) -> Expr {
    Expr::Num(Number::Int(text.to_string()))
}

fn bin(op: BinaryOp, l: Expr, r: Expr) -> Expr {
    Expr::Binary(op, Box::new(l), Box::new(r))
}

#[test]
fn parses_precedence() {
    let body = parse("a + b * c").unwrap();
    assert_eq!(
        body.statements,
        [Statement::Value(bin(
            BinaryOp::Add,
            place("a"),
            bin(BinaryOp::Mul, place("b"), place("c"))
        ))]
    );
}

#[test]
fn parentheses_group() {
    let body = parse("(a - b) % c").unwrap();
    assert_eq!(
        body.statements,
        [Statement::Value(bin(
            BinaryOp::Mod,
            bin(BinaryOp::Sub, place("a"), place("b")),
            place("c")
        ))]
    );
}

#[test]
fn parses_compound_assignment() {
    let body = parse("c[i] += a[j] * 2").unwrap();
    assert_eq!(
        body.statements,
        [Statement::Assign {
            target: Place("c[i]".to_string()),
            op: AssignOp(Some(BinaryOp::Add)),
            value: bin(BinaryOp::Mul, place("a[j]"), int("2")),
        }]
    );
}

#[test]
fn places_keep_bracketed_c_text() {
    let body = parse("x->r = m[i*lda + (j - 1)].n + row(i, k)").unwrap();
    let Statement::Assign { target, value, .. } = &body.statements[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(target.text(), "x->r");
    assert_eq!(
        value,
        &bin(BinaryOp::Add, place("m[i*lda + (j - 1)].n"), place("row(i, k)"))
    );
}

#[test]
fn comparison_is_boolean() {
    let body = parse("a[i] != 0").unwrap();
    assert!(body.is_boolean());
    assert_eq!(
        body.statements,
        [Statement::Compare {
            op: CmpOp::NotEq,
            lhs: place("a[i]"),
            rhs: int("0"),
        }]
    );
}

#[test]
fn negative_literals_fold() {
    let body = parse("x = -1 - -2.5").unwrap();
    let Statement::Assign { value, .. } = &body.statements[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(
        value,
        &bin(
            BinaryOp::Sub,
            int("-1"),
            Expr::Num(Number::Float("-2.5".to_string()))
        )
    );
}

#[test]
fn unary_not_and_neg_on_places() {
    let body = parse("!-a").unwrap();
    assert_eq!(
        body.statements,
        [Statement::Value(Expr::Unary(
            UnaryOp::Not,
            Box::new(Expr::Unary(UnaryOp::Neg, Box::new(place("a"))))
        ))]
    );
}

#[test]
fn semicolons_separate_statements() {
    let body = parse("t = a; a = b; b = t;").unwrap();
    assert_eq!(body.statements.len(), 3);
    assert!(!body.is_boolean());
}

#[test]
fn rejects_malformed_bodies() {
    let err = |src: &str| match parse(src).unwrap_err() {
        ExprError::Malformed { message, .. } => message,
        other => panic!("unexpected error {other:?}"),
    };
    assert_eq!(err(""), "empty expression");
    assert_eq!(err("a + b = c"), "`=` needs a place on its left");
    assert_eq!(err("a < b < c"), "comparisons cannot be chained");
    assert_eq!(err("a == b; c = d"), "a comparison must be the only statement");
    assert_eq!(err("a[i"), "unclosed bracket");
    assert_eq!(err("a[i)"), "mismatched brackets");
    assert_eq!(err("a +"), "expected a number, a place or `(`, found end of expression");
    assert_eq!(err("a b"), "expected `;` or end of expression, found `b`");
    assert_eq!(err("a & b"), "expected `;` or end of expression, found `&`");
}
