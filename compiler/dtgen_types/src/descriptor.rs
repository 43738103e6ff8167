//! Type descriptors: one entry per numeric storage kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Algebraic kind of a numeric type.
///
/// `None` marks sentinels: the invalid type at position 0 and the optional
/// trailing count entry. Sentinels only exist to force error results in the
/// lattice and dispatch tables.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    None,
    Integer,
    Float,
    Complex,
    Rational,
    /// Boxed host value (`VALUE`).
    #[serde(alias = "value", alias = "boxed")]
    Object,
}

impl Category {
    pub const fn name(self) -> &'static str {
        match self {
            Category::None => "none",
            Category::Integer => "integer",
            Category::Float => "float",
            Category::Complex => "complex",
            Category::Rational => "rational",
            Category::Object => "object",
        }
    }

    /// Categories stored as a plain C scalar (no struct fields).
    #[inline]
    pub const fn is_native(self) -> bool {
        matches!(self, Category::Integer | Category::Float)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a type is stored in the target language.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Storage {
    /// A literal byte count. Only sentinels use this (`0`).
    Fixed(u32),
    /// A named C type: `int32_t`, `double`, `complex64`, `VALUE`, ...
    Named(String),
}

impl Storage {
    pub fn named(name: impl Into<String>) -> Self {
        Storage::Named(name.into())
    }

    /// Expression for the sizeof table: `0` or `sizeof(int32_t)`.
    pub fn sizeof_expr(&self) -> String {
        match self {
            Storage::Fixed(n) => n.to_string(),
            Storage::Named(name) => format!("sizeof({name})"),
        }
    }

    /// Base name of the limit macros: `u_int8_t` → `UINT8`, `int32_t` → `INT32`.
    fn macro_stem(&self) -> String {
        let name = self.to_string();
        let stem = match name.rsplit_once('_') {
            Some((head, _)) => head.replace('_', ""),
            None => name,
        };
        stem.to_ascii_uppercase()
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::Fixed(n) => write!(f, "{n}"),
            Storage::Named(name) => f.write_str(name),
        }
    }
}

/// Position of a type in its registry.
///
/// Only a [`TypeRegistry`](crate::TypeRegistry) hands these out, so a `Dtype`
/// is always a valid index into the registry that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Dtype(u8);

impl Dtype {
    pub(crate) const fn new(position: u8) -> Self {
        Dtype(position)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// One numeric storage kind.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeDescriptor {
    enum_tag: String,
    storage: Storage,
    sym: String,
    short_id: String,
    category: Category,
    width: u32,
    signed: bool,
    max: Option<String>,
    min: Option<String>,
}

impl TypeDescriptor {
    /// Create a concrete type. Integers default to signed.
    pub fn new(
        enum_tag: impl Into<String>,
        storage: Storage,
        sym: impl Into<String>,
        short_id: impl Into<String>,
        category: Category,
        width: u32,
    ) -> Self {
        TypeDescriptor {
            enum_tag: enum_tag.into(),
            storage,
            sym: sym.into(),
            short_id: short_id.into(),
            category,
            width,
            signed: category != Category::None,
            max: None,
            min: None,
        }
    }

    /// Create a sentinel entry (`NM_NONE`, `NM_TYPES`).
    pub fn sentinel(enum_tag: impl Into<String>, sym: impl Into<String>) -> Self {
        Self::new(enum_tag, Storage::Fixed(0), sym, "", Category::None, 0)
    }

    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn enum_tag(&self) -> &str {
        &self.enum_tag
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn sym(&self) -> &str {
        &self.sym
    }

    pub fn short_id(&self) -> &str {
        &self.short_id
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Storage width in bytes (0 for sentinels).
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn signed(&self) -> bool {
        self.signed
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.category == Category::None
    }

    /// `true` when this is the `(category, width)` representative.
    #[inline]
    pub fn is(&self, category: Category, width: u32) -> bool {
        self.category == category && self.width == width
    }

    /// Name of the maximum-value constant, e.g. `INT32_MAX`.
    pub fn max_macro(&self) -> String {
        self.max
            .clone()
            .unwrap_or_else(|| format!("{}_MAX", self.storage.macro_stem()))
    }

    /// Name of the minimum-value constant, e.g. `INT32_MIN`.
    pub fn min_macro(&self) -> String {
        self.min
            .clone()
            .unwrap_or_else(|| format!("{}_MIN", self.storage.macro_stem()))
    }
}
