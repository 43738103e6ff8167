//! The generation manifest.
//!
//! A JSON document naming the type registry, the artifact files, the
//! blueprints whose templates are expanded and the dispatch tables to emit.
//! Every field but `blueprints` has a default; [`Manifest::nmatrix`] is the
//! complete built-in configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use dtgen_diagnostic::{Diagnostic, ErrorCode};
use dtgen_expr::{OpSet, OperatorTable};
use dtgen_types::{
    Category, Dtype, RegistryBuilder, Storage, TypeDescriptor, TypeError, TypeRegistry,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read manifest `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Registry(#[from] TypeError),

    #[error("blueprint `{base}` is declared twice")]
    DuplicateBlueprint { base: Base },

    #[error("blueprint `{base}` binds no types")]
    EmptyBlueprint { base: Base },

    #[error("type `{id}` does not belong to blueprint `{base}`")]
    BaseMismatch { base: Base, id: String },

    #[error("blueprint `{base}` binds `{param}` to `{with}`, which has no blueprint")]
    UnknownWithBase { base: Base, param: String, with: Base },

    #[error("unknown operator `{op}` in blueprint `{base}`")]
    UnknownOperator { base: Base, op: String },

    #[error("dispatch table `{name}` has {axes} axes, expected 1 or 2")]
    DispatchAxes { name: String, axes: usize },

    #[error("dispatch table `{name}` has an empty type group")]
    EmptyDispatchGroup { name: String },
}

impl ManifestError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ManifestError::Io { .. } => ErrorCode::E9001,
            ManifestError::Registry(err) => err.code(),
            _ => ErrorCode::E2001,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ManifestError::Registry(err) => err.to_diagnostic(),
            ManifestError::BaseMismatch { base, .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_note(format!("`{base}` accepts {}", base.describe())),
            ManifestError::UnknownOperator { .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_note("operators: + - * / % == != < <= > >= !"),
            _ => Diagnostic::error(self.code()).with_message(self.to_string()),
        }
    }
}

/// Type kinds a blueprint can be declared for.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Base {
    Byte,
    Integer,
    UnsignedInteger,
    Float,
    Complex,
    Rational,
    Object,
}

impl Base {
    pub const fn name(self) -> &'static str {
        match self {
            Base::Byte => "byte",
            Base::Integer => "integer",
            Base::UnsignedInteger => "unsigned_integer",
            Base::Float => "float",
            Base::Complex => "complex",
            Base::Rational => "rational",
            Base::Object => "object",
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Base::Byte | Base::Integer | Base::UnsignedInteger => Category::Integer,
            Base::Float => Category::Float,
            Base::Complex => Category::Complex,
            Base::Rational => Category::Rational,
            Base::Object => Category::Object,
        }
    }

    /// `unsigned_integer` binds the index types, so it takes any integer.
    pub fn accepts(self, desc: &TypeDescriptor) -> bool {
        match self {
            Base::Byte => desc.category() == Category::Integer && !desc.signed(),
            Base::Integer => desc.category() == Category::Integer && desc.signed(),
            _ => desc.category() == self.category(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Base::Byte => "unsigned integer types",
            Base::Integer => "signed integer types",
            Base::UnsignedInteger => "integer types",
            Base::Float => "float types",
            Base::Complex => "complex types",
            Base::Rational => "rational types",
            Base::Object => "object types",
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRegistry {
    Nmatrix,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistrySpec {
    Builtin(BuiltinRegistry),
    Explicit(Vec<TypeEntry>),
}

impl Default for RegistrySpec {
    fn default() -> Self {
        RegistrySpec::Builtin(BuiltinRegistry::Nmatrix)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StorageSpec {
    Fixed(u32),
    Named(String),
}

/// One registry entry. Entries of category `none` are sentinels.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    #[serde(rename = "enum")]
    pub enum_tag: String,
    #[serde(default = "TypeEntry::sentinel_storage")]
    pub storage: StorageSpec,
    pub sym: String,
    #[serde(default)]
    pub id: String,
    pub category: Category,
    #[serde(default)]
    pub width: u32,
    #[serde(default = "TypeEntry::signed_default")]
    pub signed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
}

impl TypeEntry {
    fn sentinel_storage() -> StorageSpec {
        StorageSpec::Fixed(0)
    }

    fn signed_default() -> bool {
        true
    }

    pub fn to_descriptor(&self) -> TypeDescriptor {
        if self.category == Category::None {
            return TypeDescriptor::sentinel(self.enum_tag.as_str(), self.sym.as_str());
        }
        let storage = match &self.storage {
            StorageSpec::Fixed(n) => Storage::Fixed(*n),
            StorageSpec::Named(name) => Storage::named(name.as_str()),
        };
        let mut desc = TypeDescriptor::new(
            self.enum_tag.as_str(),
            storage,
            self.sym.as_str(),
            self.id.as_str(),
            self.category,
            self.width,
        );
        if !self.signed {
            desc = desc.unsigned();
        }
        if let Some(max) = &self.max {
            desc = desc.with_max(max.as_str());
        }
        if let Some(min) = &self.min {
            desc = desc.with_min(min.as_str());
        }
        desc
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactNames {
    pub enum_header: String,
    pub tables: String,
    pub dfuncs: String,
    pub dispatch: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        ArtifactNames {
            enum_header: "dtypes.h".to_string(),
            tables: "dtypes.c".to_string(),
            dfuncs: "dfuncs.c".to_string(),
            dispatch: "dispatch.c".to_string(),
        }
    }
}

/// The templated source and its prototype header.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSpec {
    pub source: String,
    /// Template copied verbatim to the top of `source`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boilerplate: Option<String>,
    pub header: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        OutputSpec {
            source: "kernels.c".to_string(),
            boilerplate: None,
            header: "kernels.h".to_string(),
        }
    }
}

/// Template names expanded together, plus extra parameters bound to the
/// types of other blueprints.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSet {
    pub names: Vec<String>,
    /// Extra parameters follow the blueprint's own, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub with: IndexMap<String, Base>,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Blueprint {
    pub base: Base,
    #[serde(default = "Blueprint::default_param")]
    pub param: String,
    /// Short ids, in expansion order.
    pub types: Vec<String>,
    #[serde(default)]
    pub sources: Vec<SourceSet>,
    /// Operators `%%P <expr>%%` markers may use for this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ops: Option<Vec<String>>,
}

impl Blueprint {
    fn default_param() -> String {
        "TYPE".to_string()
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSpec {
    pub name: String,
    pub operation: String,
    /// One type group per axis; each entry is a subset name or short id.
    pub on: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_type: Option<String>,
}

impl DispatchSpec {
    /// Declared element type, defaulting to `nm_<operation>_t`.
    pub fn c_type(&self) -> String {
        self.c_type
            .clone()
            .unwrap_or_else(|| format!("nm_{}_t", self.operation))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub registry: RegistrySpec,
    #[serde(default = "Manifest::default_enum_name")]
    pub enum_name: String,
    #[serde(default = "Manifest::default_error_stub")]
    pub error_stub: String,
    /// `#include` targets of the set-function artifact.
    #[serde(default = "Manifest::default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub artifacts: ArtifactNames,
    #[serde(default = "Manifest::default_templates")]
    pub templates: PathBuf,
    #[serde(default)]
    pub output: OutputSpec,
    pub blueprints: Vec<Blueprint>,
    #[serde(default)]
    pub dispatch: Vec<DispatchSpec>,
}

impl Manifest {
    fn default_enum_name() -> String {
        "dtype_t".to_string()
    }

    fn default_error_stub() -> String {
        dtgen_types::ERROR_STUB.to_string()
    }

    fn default_includes() -> Vec<String> {
        vec!["<ruby.h>".to_string(), "\"nmatrix.h\"".to_string()]
    }

    fn default_templates() -> PathBuf {
        PathBuf::from("templates")
    }

    pub fn from_json(text: &str) -> Result<Manifest, ManifestError> {
        serde_json::from_str(text).map_err(|e| ManifestError::Parse {
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> String {
        // Every field is a string, number, list or string-keyed map.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn build_registry(&self) -> Result<TypeRegistry, ManifestError> {
        match &self.registry {
            RegistrySpec::Builtin(BuiltinRegistry::Nmatrix) => Ok(TypeRegistry::nmatrix()),
            RegistrySpec::Explicit(entries) => Ok(RegistryBuilder::from_types(
                entries.iter().map(TypeEntry::to_descriptor).collect(),
            )
            .build()?),
        }
    }

    pub fn blueprint(&self, base: Base) -> Option<&Blueprint> {
        self.blueprints.iter().find(|b| b.base == base)
    }

    /// The types `blueprint` binds, in declaration order.
    pub fn blueprint_types(
        &self,
        registry: &TypeRegistry,
        blueprint: &Blueprint,
    ) -> Result<Vec<Dtype>, ManifestError> {
        blueprint
            .types
            .iter()
            .map(|id| {
                let dtype = registry.by_short_id(id).ok_or_else(|| TypeError::UnknownType {
                    name: id.clone(),
                })?;
                if blueprint.base.accepts(registry.get(dtype)) {
                    Ok(dtype)
                } else {
                    Err(ManifestError::BaseMismatch {
                        base: blueprint.base,
                        id: id.clone(),
                    })
                }
            })
            .collect()
    }

    /// Resolves the axes of a dispatch request.
    pub fn dispatch_groups(
        &self,
        registry: &TypeRegistry,
        request: &DispatchSpec,
    ) -> Result<Vec<Vec<Dtype>>, ManifestError> {
        if !(1..=2).contains(&request.on.len()) {
            return Err(ManifestError::DispatchAxes {
                name: request.name.clone(),
                axes: request.on.len(),
            });
        }
        request
            .on
            .iter()
            .map(|group| {
                let types = registry.resolve_group(group)?;
                if types.is_empty() {
                    return Err(ManifestError::EmptyDispatchGroup {
                        name: request.name.clone(),
                    });
                }
                Ok(types)
            })
            .collect()
    }

    /// Operators enabled per category. Categories whose blueprints list no
    /// `ops` stay unrestricted.
    pub fn operator_table(&self) -> Result<OperatorTable, ManifestError> {
        let mut table = OperatorTable::permissive();
        for blueprint in &self.blueprints {
            let Some(ops) = &blueprint.ops else {
                continue;
            };
            let set = OpSet::parse(ops).map_err(|op| ManifestError::UnknownOperator {
                base: blueprint.base,
                op,
            })?;
            table.enable(blueprint.base.category(), set);
        }
        Ok(table)
    }

    /// Checks every cross-reference against `registry`.
    pub fn validate(&self, registry: &TypeRegistry) -> Result<(), ManifestError> {
        for (i, blueprint) in self.blueprints.iter().enumerate() {
            if self.blueprints[..i].iter().any(|b| b.base == blueprint.base) {
                return Err(ManifestError::DuplicateBlueprint {
                    base: blueprint.base,
                });
            }
            if blueprint.types.is_empty() {
                return Err(ManifestError::EmptyBlueprint {
                    base: blueprint.base,
                });
            }
            self.blueprint_types(registry, blueprint)?;
            for source in &blueprint.sources {
                for (param, with) in &source.with {
                    if self.blueprint(*with).is_none() {
                        return Err(ManifestError::UnknownWithBase {
                            base: blueprint.base,
                            param: param.clone(),
                            with: *with,
                        });
                    }
                }
            }
        }
        self.operator_table()?;
        for request in &self.dispatch {
            self.dispatch_groups(registry, request)?;
        }
        Ok(())
    }

    /// The built-in NMatrix configuration.
    pub fn nmatrix() -> Manifest {
        let strings = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();
        let uint = || IndexMap::from([("UINT".to_string(), Base::UnsignedInteger)]);
        let blueprint = |base, types: &[&str], names: &[&str], ops: &[&str]| Blueprint {
            base,
            param: Blueprint::default_param(),
            types: strings(types),
            sources: vec![
                SourceSet {
                    names: strings(names),
                    with: IndexMap::new(),
                },
                SourceSet {
                    names: strings(&["transp"]),
                    with: uint(),
                },
            ],
            ops: Some(strings(ops)),
        };
        let all_ops: &[&str] = &["+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "!"];

        let dispatch = |name: &str, operation: &str, on: &[&[&str]]| DispatchSpec {
            name: name.to_string(),
            operation: operation.to_string(),
            on: on.iter().map(|group| strings(group)).collect(),
            c_type: None,
        };

        Manifest {
            registry: RegistrySpec::default(),
            enum_name: Self::default_enum_name(),
            error_stub: Self::default_error_stub(),
            includes: Self::default_includes(),
            artifacts: ArtifactNames::default(),
            templates: Self::default_templates(),
            output: OutputSpec {
                boilerplate: Some("kernels_header".to_string()),
                ..OutputSpec::default()
            },
            blueprints: vec![
                blueprint(Base::Byte, &["b"], &["ew_hom"], all_ops),
                blueprint(Base::Integer, &["i8", "i16", "i32", "i64"], &["gcf", "ew_hom"], all_ops),
                Blueprint {
                    base: Base::UnsignedInteger,
                    param: "UINT".to_string(),
                    types: strings(&["i8", "i16", "i32", "i64"]),
                    sources: Vec::new(),
                    ops: None,
                },
                blueprint(
                    Base::Float,
                    &["f32", "f64"],
                    &["eqeq", "ew_hom"],
                    &["+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">="],
                ),
                blueprint(
                    Base::Complex,
                    &["c64", "c128"],
                    &["add2", "sub2", "mul2", "div2", "eqeq", "ew_hom"],
                    &["+", "-", "*", "/", "==", "!="],
                ),
                blueprint(
                    Base::Rational,
                    &["r32", "r64", "r128"],
                    &["add2", "sub2", "mul2", "div2", "mod2", "ew_hom"],
                    all_ops,
                ),
                blueprint(Base::Object, &["v"], &["ew_hom"], all_ops),
            ],
            dispatch: vec![
                dispatch("EwDenseHom", "ew_hom", &[&["actual"]]),
                dispatch("EqEq", "eqeq", &[&["float", "complex"]]),
                dispatch("Transp", "transp", &[&["actual"], &["index"]]),
            ],
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
