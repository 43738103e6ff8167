//! Set (copy/convert) and increment functions.
//!
//! One static set function per ordered pair of concrete types, plus the
//! `SetFuncs` matrix and the `Increment` table that dispatch to them.

use dtgen_types::{Dtype, Mangler, Subset, TypeRegistry};

use crate::{emit_assign, DispatchTable, Emitter, StringEmitter, UnsupportedConversion};

/// Result of generating the set/increment artifact.
#[derive(Debug)]
pub struct DfuncsOutput {
    /// Body of the artifact (without banner and guard).
    pub text: String,
    /// Pairs skipped because no conversion rule exists.
    pub omitted: Vec<UnsupportedConversion>,
    pub set_table: DispatchTable,
    pub increment_table: DispatchTable,
}

pub struct SetFunctions<'a> {
    registry: &'a TypeRegistry,
    mangler: &'a Mangler,
    includes: Vec<String>,
}

impl<'a> SetFunctions<'a> {
    pub fn new(registry: &'a TypeRegistry, mangler: &'a Mangler) -> Self {
        SetFunctions {
            registry,
            mangler,
            includes: vec!["<ruby.h>".to_string(), "\"nmatrix.h\"".to_string()],
        }
    }

    /// Replace the `#include` targets written at the top of the artifact.
    #[must_use]
    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.includes = includes;
        self
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn generate(&self) -> DfuncsOutput {
        let mut out = StringEmitter::new();
        for include in &self.includes {
            out.emit_line(&format!("#include {include}"));
        }
        out.emit_newline();
        self.error_stub(&mut out);

        let mut omitted = Vec::new();
        let mut supported: Vec<(Dtype, Dtype)> = Vec::new();
        let types = self.registry.dispatch_types();
        for &i in &types {
            for &j in &types {
                let (dest, src) = (self.registry.get(i), self.registry.get(j));
                if dest.is_sentinel() || src.is_sentinel() {
                    continue;
                }
                match emit_assign(dest, src) {
                    Ok(body) => {
                        self.set_function(&mut out, i, j, &body);
                        supported.push((i, j));
                    }
                    Err(err) => {
                        tracing::warn!(dest = dest.sym(), src = src.sym(), "{err}");
                        omitted.push(err);
                    }
                }
            }
        }

        let set_table = DispatchTable::binary_with(
            "SetFuncs",
            "nm_setfunc_t",
            self.registry,
            self.mangler,
            |i, j| {
                supported
                    .contains(&(i, j))
                    .then(|| self.mangler.mangle_dtypes(self.registry, "set", &[i, j]))
            },
        );
        out.emit_newline();
        out.emit(&set_table.render());

        let index = self.registry.named_subset(Subset::Index);
        for &t in &index {
            let symbol = self.mangler.mangle_dtypes(self.registry, "increment", &[t]);
            out.emit_line(&format!(
                "static void {symbol}(void* p) {{ ++(*({}*)p); }}",
                self.registry.get(t).storage()
            ));
        }
        let increment_table = DispatchTable::unary(
            "Increment",
            "nm_incfunc_t",
            self.registry,
            self.mangler,
            "increment",
            &index,
        );
        out.emit_newline();
        out.emit(&increment_table.render());

        DfuncsOutput {
            text: out.output(),
            omitted,
            set_table,
            increment_table,
        }
    }

    fn error_stub(&self, out: &mut StringEmitter) {
        out.emit_line(&format!("static void {}(void) {{", self.mangler.error_stub()));
        out.emit_indent(1);
        out.emit_line("rb_raise(rb_eTypeError, \"illegal operation with this type\");");
        out.emit_line("}");
        out.emit_newline();
    }

    fn set_function(&self, out: &mut StringEmitter, i: Dtype, j: Dtype, body: &str) {
        let symbol = self.mangler.mangle_dtypes(self.registry, "set", &[i, j]);
        out.emit_line(&format!(
            "static void {symbol}(size_t n, char* p1, size_t i1, char* p2, size_t i2) {{"
        ));
        out.emit_indent(1);
        out.emit_line("for (; n > 0; --n) {");
        out.emit_indent(2);
        out.emit_line(body);
        out.emit_indent(2);
        out.emit_line("p1 += i1; p2 += i2;");
        out.emit_indent(1);
        out.emit_line("}");
        out.emit_line("}");
        out.emit_newline();
    }
}
