//! Instantiating one template for one set of bound types.

use std::path::{Path, PathBuf};

use dtgen_diagnostic::{Diagnostic, Location};
use dtgen_expr::{ExprError, OperatorTable, Translator};
use dtgen_types::{Dtype, Mangler, PromotionLattice, TypeRegistry};

use crate::comments::CommentScanner;
use crate::declarations::{reduce_to_prototype, DeclarationHarvester, Omitted};
use crate::markers::{find_dangling, replace_spans, scalar};
use crate::meta::MetaContext;
use crate::TemplateError;

/// A template parameter and the type bound to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub param: String,
    pub dtype: Dtype,
}

impl Binding {
    pub fn new(param: impl Into<String>, dtype: Dtype) -> Self {
        Binding {
            param: param.into(),
            dtype,
        }
    }
}

/// A loaded `.template.c` file.
#[derive(Clone, Debug)]
pub struct Template {
    path: PathBuf,
    text: String,
}

impl Template {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Template {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Output of one instantiation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instantiation {
    pub text: String,
    /// Header prototypes of the functions defined in `text`.
    pub prototypes: Vec<String>,
    pub warnings: Vec<Diagnostic>,
}

#[derive(Clone, Copy)]
pub struct TemplateEngine<'a> {
    registry: &'a TypeRegistry,
    lattice: &'a PromotionLattice,
    mangler: &'a Mangler,
    translator: Translator<'a>,
}

impl<'a> TemplateEngine<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        lattice: &'a PromotionLattice,
        mangler: &'a Mangler,
        ops: &'a OperatorTable,
    ) -> Self {
        TemplateEngine {
            registry,
            lattice,
            mangler,
            translator: Translator::new(registry, mangler, ops),
        }
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Expands every marker of `template` for `bindings`.
    pub fn instantiate(
        &self,
        template: &Template,
        bindings: &[Binding],
    ) -> Result<Instantiation, TemplateError> {
        tracing::debug!(
            template = %template.path().display(),
            types = ?bindings
                .iter()
                .map(|b| self.registry.get(b.dtype).short_id())
                .collect::<Vec<_>>(),
            "instantiating"
        );
        let meta = MetaContext {
            registry: self.registry,
            lattice: self.lattice,
            mangler: self.mangler,
            bindings,
        };
        let mut comments = CommentScanner::new();
        let mut harvester = DeclarationHarvester::new();
        let mut out = Instantiation {
            text: String::with_capacity(template.text().len()),
            ..Instantiation::default()
        };

        for (index, raw) in template.text().lines().enumerate() {
            let line_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let location = || Location::new(template.path(), line_no);
            let mut line = comments.strip(raw);

            for binding in bindings {
                line = self
                    .substitute(line, binding)
                    .map_err(|source| TemplateError::Expression {
                        source,
                        location: location(),
                    })?;
            }
            if line.contains("%%=") {
                line = replace_spans(&line, "%%=", |statement| {
                    meta.render(statement).map_err(|source| TemplateError::Meta {
                        statement: statement.to_string(),
                        source,
                        location: location(),
                    })
                })?;
            }
            if let Some(marker) = find_dangling(&line) {
                return Err(TemplateError::DanglingMarker {
                    marker: marker.to_string(),
                    location: location(),
                });
            }

            let before = harvester.captured().len();
            harvester.feed(&line);
            if let Some(raw) = harvester.captured().get(before) {
                match reduce_to_prototype(raw) {
                    Ok(prototype) => out.prototypes.push(prototype),
                    Err(Omitted::InternalLinkage(_)) => {}
                    Err(omitted) => {
                        tracing::warn!(location = %location(), "{omitted}");
                        out.warnings.extend(
                            omitted
                                .to_diagnostic()
                                .map(|diag| diag.with_location(location())),
                        );
                    }
                }
            }

            out.text.push_str(&line);
            out.text.push('\n');
        }
        Ok(out)
    }

    /// Resolves the markers of one parameter.
    fn substitute(&self, line: String, binding: &Binding) -> Result<String, ExprError> {
        let param = binding.param.as_str();
        if !line.contains(&format!("%%{param}")) {
            return Ok(line);
        }
        let desc = self.registry.get(binding.dtype);
        let mut line = line
            .replace(&scalar(param, ""), &desc.storage().to_string())
            .replace(&scalar(param, "ABBREV"), desc.short_id())
            .replace(&scalar(param, "MAX"), &desc.max_macro())
            .replace(&scalar(param, "MIN"), &desc.min_macro());

        let long_storage = scalar(param, "LONG");
        let long_abbrev = scalar(param, "LONG_ABBREV");
        if line.contains(&long_storage) || line.contains(&long_abbrev) {
            let widened = self.registry.widen(binding.dtype).map_err(|_| {
                ExprError::UnsupportedOperation {
                    op: "widen".to_string(),
                    sym: desc.sym().to_string(),
                    category: desc.category(),
                }
            })?;
            let long = self.registry.get(widened);
            line = line
                .replace(&long_storage, &long.storage().to_string())
                .replace(&long_abbrev, long.short_id());
        }

        let line = replace_spans(&line, &format!("%%{param} "), |expr| {
            self.translator
                .translate(expr, binding.dtype)
                .map(|t| t.render())
        })?;
        replace_spans(&line, &format!("%%{param}_LONG "), |expr| {
            self.translator
                .translate_widened(expr, binding.dtype)
                .map(|t| t.render())
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
