use pretty_assertions::assert_eq;

use dtgen_template::MemoryLoader;
use indexmap::IndexMap;

use crate::manifest::{Base, Blueprint, SourceSet};

use super::*;

const SEVEN_TYPES: &str = r#"{
    "registry": [
        { "enum": "NM_NONE", "sym": "none", "category": "none" },
        { "enum": "NM_BYTE", "storage": "u_int8_t", "sym": "byte", "id": "b", "category": "integer", "width": 1, "signed": false },
        { "enum": "NM_INT32", "storage": "int32_t", "sym": "int32", "id": "i32", "category": "integer", "width": 4 },
        { "enum": "NM_FLOAT64", "storage": "double", "sym": "float64", "id": "f64", "category": "float", "width": 8 },
        { "enum": "NM_COMPLEX128", "storage": "complex128", "sym": "complex128", "id": "c128", "category": "complex", "width": 16 },
        { "enum": "NM_RATIONAL64", "storage": "rational64", "sym": "rational64", "id": "r64", "category": "rational", "width": 16 },
        { "enum": "NM_ROBJ", "storage": "VALUE", "sym": "object", "id": "v", "category": "object", "width": 8 }
    ],
    "blueprints": [
        { "base": "integer", "types": ["i32"], "sources": [{ "names": ["op"], "with": { "UINT": "byte" } }] },
        { "base": "float", "types": ["f64"], "sources": [{ "names": ["op"], "with": { "UINT": "byte" } }] },
        { "base": "byte", "param": "UINT", "types": ["b"] }
    ],
    "dispatch": [{ "name": "OpTable", "operation": "op", "on": [["i32", "f64"], ["b"]] }]
}"#;

const OP_TEMPLATE: &str = "\
void %%= mangle(\"op\")%%(%%TYPE%%* a, const %%UINT%%* b, size_t n)
{
  size_t i;
  for (i = 0; i < n; ++i) {
    %%TYPE a[i] += b[i]%%
  }
}
";

fn seven_types() -> Generation {
    let manifest = Manifest::from_json(SEVEN_TYPES).unwrap();
    generate(&manifest, MemoryLoader::new().with("op", OP_TEMPLATE)).unwrap()
}

#[test]
fn artifacts_in_order() {
    let generation = seven_types();
    let names: Vec<&str> = generation.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        ["dtypes.h", "dtypes.c", "dfuncs.c", "kernels.c", "kernels.h", "dispatch.c"]
    );
}

#[test]
fn seven_type_scenario() {
    let generation = seven_types();
    let kernels = &generation.artifact("kernels.c").unwrap().contents;
    assert_eq!(kernels.matches("\n{\n").count(), 2);
    assert!(kernels.starts_with("void Op_i32_b(int32_t* a, const u_int8_t* b, size_t n)\n"));
    assert!(kernels.contains("void Op_f64_b(double* a, const u_int8_t* b, size_t n)\n"));
    assert!(kernels.contains("    a[i] += b[i];\n"));
    assert_eq!(generation.report.instantiations, 2);

    assert_eq!(generation.report.dispatch, [("OpTable".to_string(), 2)]);
    let dispatch = &generation.artifact("dispatch.c").unwrap().contents;
    let stub_row = format!("{{ {} }}", vec!["TypeErr"; 7].join(", "));
    assert_eq!(dispatch.matches(&stub_row).count(), 5);
    assert!(dispatch.contains("{ TypeErr, Op_i32_b, TypeErr, TypeErr, TypeErr, TypeErr, TypeErr }"));
    assert!(dispatch.contains("{ TypeErr, Op_f64_b, TypeErr, TypeErr, TypeErr, TypeErr, TypeErr }"));
    assert!(dispatch.contains("nm_op_t OpTable ="));
}

#[test]
fn header_holds_harvested_prototypes() {
    let generation = seven_types();
    assert_eq!(
        generation.artifact("kernels.h").unwrap().contents,
        "\
/* Automatically created by dtgen - do not modify! */
#ifndef KERNELS_H
# define KERNELS_H

void Op_i32_b(int32_t*,const u_int8_t*,size_t);
void Op_f64_b(double*,const u_int8_t*,size_t);

#endif

"
    );
    assert_eq!(generation.report.prototypes, 2);
}

#[test]
fn unsupported_conversions_are_warnings() {
    let generation = seven_types();
    let warnings = &generation.report.warnings;
    assert_eq!(warnings.len(), 3);
    assert!(warnings.iter().all(|w| w.code == ErrorCode::E1001 && !w.is_error()));
}

#[test]
fn boilerplate_comes_first() {
    let mut manifest = Manifest::from_json(SEVEN_TYPES).unwrap();
    manifest.output.boilerplate = Some("head".to_string());
    let loader = MemoryLoader::new()
        .with("op", OP_TEMPLATE)
        .with("head", "#include \"kernels.h\"\n/* %%TYPE%% is not expanded here */");
    let generation = generate(&manifest, loader).unwrap();
    let kernels = &generation.artifact("kernels.c").unwrap().contents;
    assert!(kernels.starts_with(
        "#include \"kernels.h\"\n/* %%TYPE%% is not expanded here */\nvoid Op_i32_b("
    ));
}

#[test]
fn extra_parameters_keep_declaration_order() {
    let mut manifest = Manifest::from_json(SEVEN_TYPES).unwrap();
    manifest.blueprints[1].sources.clear();
    manifest.blueprints[0].sources = vec![SourceSet {
        names: vec!["pair".to_string()],
        with: IndexMap::from([
            ("ZIDX".to_string(), Base::UnsignedInteger),
            ("AIDX".to_string(), Base::Float),
        ]),
    }];
    manifest.blueprints.push(Blueprint {
        base: Base::UnsignedInteger,
        param: "UINT".to_string(),
        types: vec!["b".to_string(), "i32".to_string()],
        sources: Vec::new(),
        ops: None,
    });
    let loader = MemoryLoader::new().with(
        "pair",
        "void %%= mangle(\"pair\")%%(%%ZIDX%% z, %%AIDX%% a)\n{\n}\n",
    );
    let generation = generate(&manifest, loader).unwrap();
    let header = &generation.artifact("kernels.h").unwrap().contents;
    assert!(header.contains(
        "void Pair_i32_b_f64(u_int8_t,double);\nvoid Pair_i32_i32_f64(int32_t,double);\n"
    ));
}

#[test]
fn template_errors_abort_the_run() {
    let manifest = Manifest::from_json(SEVEN_TYPES).unwrap();
    let loader = MemoryLoader::new().with("op", "x = %%INT%%;");
    let err = generate(&manifest, loader).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1003);
    assert_eq!(
        err.to_diagnostic().location.unwrap().to_string(),
        "op.template.c:1"
    );
}

#[test]
fn manifest_errors_abort_before_templates() {
    let mut manifest = Manifest::from_json(SEVEN_TYPES).unwrap();
    manifest.blueprints[0].types.push("c128".to_string());
    let err = generate(&manifest, MemoryLoader::new()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
}

#[test]
fn write_creates_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");
    let generation = seven_types();
    generation.write(&out).unwrap();
    for artifact in &generation.artifacts {
        let written = fs::read_to_string(out.join(&artifact.name)).unwrap();
        assert_eq!(written, artifact.contents);
    }
}
