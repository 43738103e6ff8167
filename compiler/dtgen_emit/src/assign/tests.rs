use dtgen_types::TypeRegistry;
use pretty_assertions::assert_eq;

use super::*;

const CATEGORIES: [Category; 5] = [
    Category::Integer,
    Category::Float,
    Category::Complex,
    Category::Rational,
    Category::Object,
];

fn assign(dest: &str, src: &str) -> Result<String, UnsupportedConversion> {
    let registry = TypeRegistry::nmatrix();
    let dest = registry.get(registry.by_short_id(dest).unwrap());
    let src = registry.get(registry.by_short_id(src).unwrap());
    emit_assign(dest, src)
}

#[test]
fn exactly_three_category_pairs_are_unsupported() {
    let mut unsupported = Vec::new();
    for dest in CATEGORIES {
        for src in CATEGORIES {
            if ConversionRule::select(dest, src).is_none() {
                unsupported.push((dest, src));
            }
        }
    }
    assert_eq!(
        unsupported,
        [
            (Category::Complex, Category::Rational),
            (Category::Rational, Category::Float),
            (Category::Rational, Category::Complex),
        ]
    );
}

#[test]
fn sentinel_category_is_never_convertible() {
    for cat in CATEGORIES {
        assert_eq!(ConversionRule::select(Category::None, cat), None);
        assert_eq!(ConversionRule::select(cat, Category::None), None);
    }
}

#[test]
fn native_to_native_is_a_plain_copy() {
    assert_eq!(assign("i32", "f64").unwrap(), "*(int32_t*)p1 = *(double*)p2;");
}

#[test]
fn complex_from_float_zeroes_imaginary_part() {
    assert_eq!(
        assign("c64", "f32").unwrap(),
        "((complex64*)p1)->i = 0; ((complex64*)p1)->r = *(float*)p2;"
    );
}

#[test]
fn float_from_complex_takes_real_part() {
    assert_eq!(
        assign("f64", "c128").unwrap(),
        "*(double*)p1 = ((complex128*)p2)->r;"
    );
}

#[test]
fn rational_to_native_divides() {
    assert_eq!(
        assign("f32", "r64").unwrap(),
        "*(float*)p1 = ((rational64*)p2)->n / (double)((rational64*)p2)->d;"
    );
    assert_eq!(
        assign("i16", "r32").unwrap(),
        "*(int16_t*)p1 = ((rational32*)p2)->n / ((rational32*)p2)->d;"
    );
}

#[test]
fn rational_from_integer_sets_unit_denominator() {
    assert_eq!(
        assign("r128", "b").unwrap(),
        "((rational128*)p1)->d = 1; ((rational128*)p1)->n = *(u_int8_t*)p2;"
    );
}

#[test]
fn objects_box_by_category() {
    assert_eq!(assign("v", "i64").unwrap(), "*(VALUE*)p1 = INT2NUM(*(int64_t*)p2);");
    assert_eq!(assign("v", "f32").unwrap(), "*(VALUE*)p1 = rb_float_new(*(float*)p2);");
    assert_eq!(
        assign("v", "r32").unwrap(),
        "*(VALUE*)p1 = rb_rational_new(INT2FIX(((rational32*)p2)->n), INT2FIX(((rational32*)p2)->d));"
    );
    assert_eq!(assign("v", "v").unwrap(), "*(VALUE*)p1 = *(VALUE*)p2;");
}

#[test]
fn objects_unbox_by_category() {
    assert_eq!(
        assign("c128", "v").unwrap(),
        "((complex128*)p1)->r = REAL2DBL(*(VALUE*)p2); ((complex128*)p1)->i = IMAG2DBL(*(VALUE*)p2);"
    );
    assert_eq!(assign("i8", "v").unwrap(), "*(int8_t*)p1 = NUM2DBL(*(VALUE*)p2);");
}

#[test]
fn unsupported_pair_reports_both_types() {
    let err = assign("r32", "f64").unwrap_err();
    assert_eq!(err.to_string(), "cannot assign float `float64` to rational `rational32`");
    let diag = err.to_diagnostic();
    assert!(!diag.is_error());
    assert_eq!(diag.code, ErrorCode::E1001);
}
