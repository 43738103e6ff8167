use pretty_assertions::assert_eq;

use super::*;

fn harvest(lines: &[&str]) -> Vec<String> {
    let mut harvester = DeclarationHarvester::new();
    for line in lines {
        harvester.feed(line);
    }
    harvester.into_captured()
}

#[test]
fn reduces_named_parameters() {
    assert_eq!(reduce_to_prototype("int Foo(int x, char y)").unwrap(), "int Foo(int,char);");
    assert_eq!(
        reduce_to_prototype("void ew_i32(const int32_t *a, double b[], size_t)").unwrap(),
        "void ew_i32(const int32_t *,double[],size_t);"
    );
    assert_eq!(reduce_to_prototype("void f(char*p)").unwrap(), "void f(char*);");
}

#[test]
fn keeps_single_token_parameters() {
    assert_eq!(reduce_to_prototype("int count(void)").unwrap(), "int count(void);");
    assert_eq!(reduce_to_prototype("int log(const char *fmt, ...)").unwrap(), "int log(const char *,...);");
    assert_eq!(reduce_to_prototype("int none()").unwrap(), "int none();");
}

#[test]
fn drops_inline() {
    assert_eq!(reduce_to_prototype("inline  int  Bar(int x)").unwrap(), "int Bar(int);");
}

#[test]
fn static_is_omitted() {
    assert_eq!(
        reduce_to_prototype("static inline int Foo(int x, char y)"),
        Err(Omitted::InternalLinkage("static inline int Foo(int x, char y)".to_string()))
    );
    assert!(Omitted::InternalLinkage(String::new()).to_diagnostic().is_none());
}

#[test]
fn unbalanced_parentheses_are_malformed() {
    let err = reduce_to_prototype("int Foo(int x").unwrap_err();
    assert!(matches!(err, Omitted::Malformed { reason: "unbalanced parentheses", .. }));
    let diag = err.to_diagnostic().unwrap();
    assert_eq!(diag.code, ErrorCode::E1004);
    assert!(!diag.is_error());

    assert!(matches!(
        reduce_to_prototype("int Foo"),
        Err(Omitted::Malformed { reason: "no parameter list", .. })
    ));
}

#[test]
fn harvests_multi_line_signatures() {
    let lines = [
        "#include <stdint.h>",
        "",
        "int",
        "Add_i32(int32_t a,",
        "        int32_t b)",
        "{",
        "  if (a) { return a + b; }",
        "  return b;",
        "}",
        "void tail(void) { return; }",
    ];
    assert_eq!(harvest(&lines), ["int Add_i32(int32_t a, int32_t b)", "void tail(void)"]);
}

#[test]
fn prototypes_and_directives_reset() {
    let lines = ["int forward(int x);", "#define X(a) (a)", "void body(void)", "{", "}"];
    assert_eq!(harvest(&lines), ["void body(void)"]);
}

#[test]
fn non_function_blocks_are_skipped() {
    let lines = [
        "typedef struct {",
        "  int n, d;",
        "} rational32;",
        "static const int table[] = { 1, 2 };",
        "int after(int a) {",
        "  puts(\"}\");",
        "}",
    ];
    assert_eq!(harvest(&lines), ["int after(int a)"]);
}
