//! End-to-end generation of the built-in NMatrix manifest against the
//! templates shipped in the repository.

#![allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]

use std::fs;
use std::path::PathBuf;

use dtgen_diagnostic::ErrorCode;
use dtgen_template::{FsLoader, MemoryLoader};
use dtgenc::{generate, Generation, Manifest, RunError};
use pretty_assertions::assert_eq;

fn template_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn nmatrix() -> Generation {
    generate(&Manifest::nmatrix(), FsLoader::new(template_root())).unwrap()
}

fn contents<'g>(generation: &'g Generation, name: &str) -> &'g str {
    &generation.artifact(name).unwrap().contents
}

#[test]
fn every_artifact_is_produced() {
    let generation = nmatrix();
    let names: Vec<&str> = generation.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        ["dtypes.h", "dtypes.c", "dfuncs.c", "kernels.c", "kernels.h", "dispatch.c"]
    );
}

#[test]
fn kernel_counts() {
    let report = nmatrix().report;
    // byte 5, integer 24, float 12, complex 20, rational 30, object 5.
    assert_eq!(report.instantiations, 96);
    assert_eq!(report.prototypes, 96);
    assert_eq!(
        report.dispatch,
        [
            ("EwDenseHom".to_string(), 13),
            ("EqEq".to_string(), 4),
            ("Transp".to_string(), 52),
        ]
    );
}

#[test]
fn unsupported_conversions_are_the_only_warnings() {
    let report = nmatrix().report;
    assert_eq!(report.warnings.len(), 18);
    assert!(report.warnings.iter().all(|w| w.code == ErrorCode::E1001));
}

#[test]
fn operators_lower_per_category() {
    let generation = nmatrix();
    let kernels = contents(&generation, "kernels.c");
    assert!(kernels.contains("int EwHom_i32(const int32_t* a, const int32_t* b, int32_t* c, const size_t n, enum ew_op_t op)\n"));
    assert!(kernels.contains("      c[i] = a[i] + b[i];\n"));
    assert!(kernels.contains("      c[i] = Add2_c64(a[i], b[i]);\n"));
    assert!(kernels.contains("      c[i] = Div2_r128(a[i], b[i]);\n"));
    assert!(kernels.contains("      c[i] = rb_funcall(a[i], rb_intern(\"*\"), 1, b[i]);\n"));
    assert!(kernels.contains("    if (a[i].r != b[i].r || a[i].i != b[i].i) {\n"));
    assert!(kernels.contains("      b[j*ldb + i] = a[i*lda + j];\n"));
    // Generation-time selection of the component type.
    assert!(kernels.contains("  float denom = y.r * y.r + y.i * y.i;\n"));
    assert!(kernels.contains("  double denom = y.r * y.r + y.i * y.i;\n"));
    // Comments are stripped and no marker survives.
    assert!(!kernels.contains("%%"));
    assert!(!kernels.contains("Greatest common factor"));
}

#[test]
fn boilerplate_leads_the_kernel_source() {
    let generation = nmatrix();
    let kernels = contents(&generation, "kernels.c");
    let header = kernels.find("#include \"kernels.h\"").unwrap();
    let first_kernel = kernels.find("EwHom_b(").unwrap();
    assert!(header < first_kernel);
    // Helpers precede the kernels that call them.
    assert!(kernels.find("Gcf_i64(int64_t x").unwrap() < kernels.find("Add2_r32(const").unwrap());
    assert!(kernels.find("Add2_c64(const").unwrap() < kernels.find("EwHom_c64(").unwrap());
}

#[test]
fn header_holds_reduced_prototypes() {
    let generation = nmatrix();
    let header = contents(&generation, "kernels.h");
    assert!(header.contains("#ifndef KERNELS_H\n# define KERNELS_H\n"));
    assert!(header.contains("int64_t Gcf_i64(int64_t,int64_t);\n"));
    assert!(header.contains("complex128 Mul2_c128(const complex128,const complex128);\n"));
    assert!(header.contains("int Eqeq_f32(const float*,const float*,const size_t,int*);\n"));
    assert!(header.contains(
        "void Transp_v_i16(const int16_t,const int16_t,const VALUE*,const int16_t,VALUE*,const int16_t);\n"
    ));
    assert_eq!(header.matches(");\n").count(), 96);
}

#[test]
fn dispatch_tables_are_full_size() {
    let generation = nmatrix();
    let dispatch = contents(&generation, "dispatch.c");
    assert!(dispatch.starts_with("/* "));
    assert!(dispatch.contains("#include \"kernels.h\""));
    assert!(dispatch.contains("nm_ew_hom_t EwDenseHom ="));
    assert!(dispatch.contains("nm_transp_t Transp ="));
    // Float and complex rows only; the byte row is all stubs.
    assert!(dispatch.contains("Eqeq_f64"));
    assert!(!dispatch.contains("Eqeq_i32"));
    assert!(dispatch.contains("Transp_r64_i32"));
    assert!(!dispatch.contains("Transp_r64_b"));
}

#[test]
fn generation_is_deterministic() {
    let first = nmatrix();
    let second = nmatrix();
    assert_eq!(first.artifacts, second.artifacts);
}

#[test]
fn written_tree_matches_memory() {
    let generation = nmatrix();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");
    generation.write(&out).unwrap();
    for artifact in &generation.artifacts {
        assert_eq!(fs::read_to_string(out.join(&artifact.name)).unwrap(), artifact.contents);
    }
}

#[test]
fn missing_template_fails_before_anything_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate(&Manifest::nmatrix(), FsLoader::new(dir.path())).unwrap_err();
    assert!(matches!(err, RunError::Template(_)));
    assert_eq!(err.code(), ErrorCode::E9001);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unsupported_operator_in_template_is_fatal() {
    let mut manifest = Manifest::nmatrix();
    manifest.output.boilerplate = None;
    let loader = MemoryLoader::new()
        .with("gcf", "int x;\n")
        .with("ew_hom", "int y;\n")
        .with("eqeq", "%%TYPE a < b%%\n")
        .with("transp", "int z;\n")
        .with("complex/add2", "int w;\n")
        .with("complex/sub2", "int w;\n")
        .with("complex/mul2", "int w;\n")
        .with("complex/div2", "int w;\n")
        .with("rational/add2", "int w;\n")
        .with("rational/sub2", "int w;\n")
        .with("rational/mul2", "int w;\n")
        .with("rational/div2", "int w;\n")
        .with("rational/mod2", "int w;\n");
    let err = generate(&manifest, loader).unwrap_err();
    // Floats order fine; complex values do not.
    assert_eq!(err.code(), ErrorCode::E1002);
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.location.unwrap().to_string(), "eqeq.template.c:1");
}
