use pretty_assertions::assert_eq;

use dtgen_types::{Mangler, PromotionLattice, TypeRegistry};

use super::*;

struct Fixture {
    registry: TypeRegistry,
    lattice: PromotionLattice,
    mangler: Mangler,
    bindings: Vec<Binding>,
}

impl Fixture {
    fn new(bound: &[(&str, &str)]) -> Self {
        let registry = TypeRegistry::nmatrix();
        let lattice = PromotionLattice::build(&registry);
        let bindings = bound
            .iter()
            .map(|(param, id)| Binding::new(*param, registry.lookup(id).unwrap()))
            .collect();
        Fixture {
            registry,
            lattice,
            mangler: Mangler::new(),
            bindings,
        }
    }

    fn ctx(&self) -> MetaContext<'_> {
        MetaContext {
            registry: &self.registry,
            lattice: &self.lattice,
            mangler: &self.mangler,
            bindings: &self.bindings,
        }
    }

    fn render(&self, src: &str) -> String {
        self.ctx().render(src).unwrap()
    }

    fn err(&self, src: &str) -> String {
        self.ctx().render(src).unwrap_err().message
    }
}

#[test]
fn type_fields() {
    let f = Fixture::new(&[("TYPE", "i32")]);
    assert_eq!(f.render("TYPE"), "int32_t");
    assert_eq!(f.render("TYPE.storage"), "int32_t");
    assert_eq!(f.render("TYPE.id"), "i32");
    assert_eq!(f.render("TYPE.sym"), "int32");
    assert_eq!(f.render("TYPE.enum"), "NM_INT32");
    assert_eq!(f.render("TYPE.width"), "4");
    assert_eq!(f.render("TYPE.category"), "integer");
    assert_eq!(f.render("TYPE.max"), "INT32_MAX");
    assert_eq!(f.render("TYPE.min"), "INT32_MIN");
    assert_eq!(f.render("TYPE.position"), "4");
    assert_eq!(f.render("TYPE.long"), "int64_t");
    assert_eq!(f.render("TYPE.long.id"), "i64");
}

#[test]
fn builtins() {
    let f = Fixture::new(&[("TYPE", "i8"), ("INT", "i32")]);
    assert_eq!(f.render(r#"mangle("ew_hom")"#), "EwHom_i8_i32");
    assert_eq!(f.render("upcast(TYPE, INT)"), "int32_t");
    assert_eq!(f.render("upcast(TYPE, INT).id"), "i32");
    assert_eq!(f.render("sizeof(INT) * 8"), "32");
}

#[test]
fn arithmetic_and_precedence() {
    let f = Fixture::new(&[]);
    assert_eq!(f.render("1 + 2 * 3"), "7");
    assert_eq!(f.render("(1 + 2) * 3"), "9");
    assert_eq!(f.render("10 / 3 - -1"), "4");
    assert_eq!(f.render(r#""n" + 2"#), "n2");
}

#[test]
fn booleans_render_as_digits() {
    let f = Fixture::new(&[("TYPE", "f32")]);
    assert_eq!(f.render(r#"TYPE.category == "float""#), "1");
    assert_eq!(f.render("TYPE.width > 4 || !true"), "0");
    assert_eq!(f.render("TYPE.width >= 4 && TYPE != upcast(TYPE, TYPE.long)"), "1");
}

#[test]
fn ternary_only_evaluates_the_taken_branch() {
    let f = Fixture::new(&[("TYPE", "r32")]);
    assert_eq!(
        f.render(r#"TYPE.category == "rational" ? TYPE.long.storage : "nope""#),
        "rational128"
    );
}

#[test]
fn sentinels_have_no_long_form() {
    let mut f = Fixture::new(&[]);
    f.bindings.push(Binding::new("TYPE", f.registry.none()));
    assert_eq!(f.render("TYPE.width"), "0");
    assert_eq!(
        f.err("TYPE.long"),
        "type `none` of category `none` has no widened form"
    );
}

#[test]
fn short_circuit_skips_failing_side() {
    let f = Fixture::new(&[("TYPE", "i16")]);
    assert_eq!(f.render("false && TYPE.nope == 1"), "0");
    assert_eq!(f.render("true || 1 / 0 == 1"), "1");
}

#[test]
fn errors() {
    let f = Fixture::new(&[("TYPE", "i32")]);
    assert_eq!(f.err("OTHER"), "unknown name `OTHER`");
    assert_eq!(f.err("TYPE.nope"), "types have no field `nope`");
    assert_eq!(f.err("1 / 0"), "division by zero");
    assert_eq!(f.err("1 + true"), "`+` is not defined for integer and boolean");
    assert_eq!(f.err("TYPE == 1"), "cannot compare type with integer");
    assert_eq!(f.err("1 ? 2 : 3"), "`?:` needs a boolean, found integer");
    assert_eq!(f.err("sizeof(1)"), "wrong arguments to `sizeof`: (integer)");
    assert_eq!(f.err("system(1)"), "unknown function `system`");
    assert_eq!(f.err(""), "empty statement");
    assert_eq!(f.err("1 +"), "unexpected end of statement");
    assert_eq!(f.err("1 2"), "unexpected `2`");
    assert_eq!(f.err("1 < 2 < 3"), "unexpected `<`");
    assert_eq!(f.err("\"open"), "unterminated string");
    assert_eq!(f.err("a $ b"), "unexpected character `$`");
}
