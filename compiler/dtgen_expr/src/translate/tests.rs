use dtgen_types::Category;
use pretty_assertions::assert_eq;

use super::*;
use crate::OpSet;

struct Fixture {
    registry: TypeRegistry,
    mangler: Mangler,
    ops: OperatorTable,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            registry: TypeRegistry::nmatrix(),
            mangler: Mangler::new(),
            ops: OperatorTable::permissive(),
        }
    }

    fn translator(&self) -> Translator<'_> {
        Translator::new(&self.registry, &self.mangler, &self.ops)
    }

    fn ty(&self, id: &str) -> Dtype {
        self.registry.by_short_id(id).unwrap()
    }

    fn plain(&self, expr: &str, id: &str) -> String {
        self.translator().translate(expr, self.ty(id)).unwrap().render()
    }

    fn long(&self, expr: &str, id: &str) -> String {
        self.translator()
            .translate_widened(expr, self.ty(id))
            .unwrap()
            .render()
    }

    fn err(&self, expr: &str, id: &str) -> ExprError {
        self.translator().translate(expr, self.ty(id)).unwrap_err()
    }
}

fn unsupported_op(err: ExprError) -> String {
    match err {
        ExprError::UnsupportedOperation { op, .. } => op,
        other => panic!("expected an unsupported operation, got {other:?}"),
    }
}

#[test]
fn float64_sum_is_a_single_infix_statement() {
    let f = Fixture::new();
    assert_eq!(f.plain("a + b", "f64"), "a + b;");
    // float64 is already the widest float: no conversion.
    assert_eq!(f.long("a + b", "f64"), "a + b;");
}

#[test]
fn widened_integer_casts_right_hand_places() {
    let f = Fixture::new();
    assert_eq!(f.long("c = a + b", "i32"), "c = (int64_t)a + (int64_t)b;");
    assert_eq!(f.long("t = -x[i]", "i8"), "t = -(int64_t)x[i];");
}

#[test]
fn native_parentheses_follow_precedence() {
    let f = Fixture::new();
    assert_eq!(f.plain("(a + b) * c", "i32"), "(a + b) * c;");
    assert_eq!(f.plain("a - (b - c)", "i32"), "a - (b - c);");
    assert_eq!(f.plain("a - b - c", "i32"), "a - b - c;");
    assert_eq!(f.plain("a * (b / c)", "i16"), "a * (b / c);");
    assert_eq!(f.plain("-(a + b)", "i64"), "-(a + b);");
    assert_eq!(f.plain("- -a", "i64"), "-(-a);");
    assert_eq!(f.plain("!a", "b"), "!a;");
}

#[test]
fn float_modulo_uses_fmod() {
    let f = Fixture::new();
    assert_eq!(f.plain("a % b", "f32"), "fmod(a, b);");
    assert_eq!(f.plain("x %= y", "f64"), "x = fmod(x, y);");
    assert_eq!(f.plain("x %= y", "i32"), "x %= y;");
}

#[test]
fn comparison_yields_one_predicate_without_semicolon() {
    let f = Fixture::new();
    let translation = f.translator().translate("a[i] != 0", f.ty("i32")).unwrap();
    assert!(translation.boolean);
    assert_eq!(translation.statements.len(), 1);
    assert_eq!(translation.to_string(), "a[i] != 0");
}

#[test]
fn statement_sequences_join_with_semicolons() {
    let f = Fixture::new();
    assert_eq!(f.plain("t = a; a = b; b = t", "i32"), "t = a;\na = b;\nb = t;");
}

#[test]
fn complex_arithmetic_calls_helpers() {
    let f = Fixture::new();
    assert_eq!(
        f.plain("c = a + b * 2", "c64"),
        "c = Add2_c64(a, Mul2_c64(b, (complex64){ 2, 0 }));"
    );
    assert_eq!(f.plain("x += y", "c128"), "x = Add2_c128(x, y);");
    assert_eq!(f.plain("x /= y", "c64"), "x = Div2_c64(x, y);");
    assert_eq!(f.plain("-a", "c64"), "(complex64){ -a.r, -a.i };");
}

#[test]
fn complex_equality_compares_components() {
    let f = Fixture::new();
    assert_eq!(f.plain("a == b", "c64"), "a.r == b.r && a.i == b.i");
    assert_eq!(f.plain("a != 0", "c128"), "a.r != 0 || a.i != 0");
}

#[test]
fn complex_rejects_ordering_modulo_and_not() {
    let f = Fixture::new();
    assert_eq!(unsupported_op(f.err("a < b", "c64")), "<");
    assert_eq!(unsupported_op(f.err("a % b", "c64")), "%");
    assert_eq!(unsupported_op(f.err("x %= y", "c64")), "%=");
    assert_eq!(unsupported_op(f.err("!a", "c128")), "!");
}

#[test]
fn widened_complex_rebuilds_struct() {
    let f = Fixture::new();
    assert_eq!(f.long("t = a", "c64"), "t = (complex128){ a.r, a.i };");
    assert_eq!(f.long("t = a", "c128"), "t = a;");
}

#[test]
fn rational_equality_shortcuts() {
    let f = Fixture::new();
    assert_eq!(f.plain("a == 0", "r32"), "a.n == 0");
    assert_eq!(f.plain("0 == a", "r32"), "a.n == 0");
    assert_eq!(f.plain("a != 1", "r64"), "a.n != a.d");
    assert_eq!(f.plain("a == b", "r64"), "a.n == b.n && a.d == b.d");
    assert_eq!(f.plain("a != b", "r64"), "a.n != b.n || a.d != b.d");
}

#[test]
fn rational_ordering_cross_multiplies() {
    let f = Fixture::new();
    assert_eq!(f.plain("a < b", "r32"), "(int64_t)a.n * b.d < (int64_t)b.n * a.d");
    assert_eq!(f.plain("a >= 2", "r32"), "(int64_t)a.n * 1 >= (int64_t)2 * a.d");
}

#[test]
fn rational_arithmetic_and_unary() {
    let f = Fixture::new();
    assert_eq!(f.plain("c = a + 1", "r32"), "c = Add2_r32(a, (rational32){ 1, 1 });");
    assert_eq!(f.plain("x %= y", "r128"), "x = Mod2_r128(x, y);");
    assert_eq!(f.plain("-a", "r32"), "(rational32){ -a.n, a.d };");
    assert_eq!(f.plain("!a", "r32"), "(rational32){ !a.n, 1 };");
    assert_eq!(unsupported_op(f.err("a + 1.5", "r32")), "float literal");
    assert_eq!(f.long("t = a", "r32"), "t = (rational128){ a.n, a.d };");
}

#[test]
fn objects_send_messages() {
    let f = Fixture::new();
    assert_eq!(
        f.plain("c = a + 1", "v"),
        "c = rb_funcall(a, rb_intern(\"+\"), 1, INT2FIX(1));"
    );
    assert_eq!(
        f.plain("a > 0.5", "v"),
        "RTEST(rb_funcall(a, rb_intern(\">\"), 1, rb_float_new(0.5)))"
    );
    assert_eq!(f.plain("-a", "v"), "rb_funcall(a, rb_intern(\"-@\"), 0);");
    assert_eq!(
        f.plain("x *= y", "v"),
        "x = rb_funcall(x, rb_intern(\"*\"), 1, y);"
    );
}

#[test]
fn sentinel_types_support_nothing() {
    let f = Fixture::new();
    let none = f.registry.none();
    let err = f.translator().translate("a + b", none).unwrap_err();
    assert_eq!(err.code(), dtgen_diagnostic::ErrorCode::E1002);
    let err = f.translator().translate_widened("a + b", none).unwrap_err();
    assert_eq!(unsupported_op(err), "widen");
}

#[test]
fn disabled_operators_are_rejected() {
    let mut f = Fixture::new();
    f.ops.enable(Category::Integer, OpSet::ADD | OpSet::EQ);
    assert_eq!(f.plain("a + b", "i32"), "a + b;");
    assert_eq!(f.plain("a == b", "i32"), "a == b");
    assert_eq!(
        f.err("a * b", "i32"),
        ExprError::DisabledOperator {
            op: "*".to_string(),
            category: Category::Integer,
        }
    );
    assert_eq!(
        f.err("x *= y", "i32"),
        ExprError::DisabledOperator {
            op: "*=".to_string(),
            category: Category::Integer,
        }
    );
    // Other categories are unaffected.
    assert_eq!(f.plain("a * b", "f32"), "a * b;");
}

#[test]
fn malformed_marker_reports_e1006() {
    let f = Fixture::new();
    let err = f.err("a + ", "i32");
    assert_eq!(err.code(), dtgen_diagnostic::ErrorCode::E1006);
}

#[test]
fn c_literal_forms_pass_through() {
    let f = Fixture::new();
    assert_eq!(f.plain("x = a * .5 + 0x10", "f64"), "x = a * .5 + 0x10;");
    assert_eq!(f.plain("a < 1.0f", "f32"), "a < 1.0f");
    assert_eq!(f.plain("c = .5", "c64"), "c = (complex64){ .5, 0 };");
    assert_eq!(f.plain("r = 0x10", "r64"), "r = (rational64){ 0x10, 1 };");
}
