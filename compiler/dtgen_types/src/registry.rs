//! The ordered type registry.
//!
//! Registry order is a contract: the enum, the sizeof and name tables, the
//! upcast matrix and every dispatch table are keyed by position. Entries are
//! never reordered after construction.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Category, Dtype, Storage, TypeDescriptor, TypeError};

/// Named, order-preserving views of the registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Subset {
    /// Every entry, sentinels included.
    All,
    /// Signed integers (the unsigned byte kind cannot index).
    Index,
    Integer,
    Rational,
    /// Integer, rational and object types: BLAS routines cannot take these.
    NonBlas,
    Complex,
    Float,
    Object,
    /// Everything but sentinels.
    Actual,
    /// Widest entry of each non-sentinel category.
    Long,
}

impl Subset {
    pub const ALL: &'static [Subset] = &[
        Subset::All,
        Subset::Index,
        Subset::Integer,
        Subset::Rational,
        Subset::NonBlas,
        Subset::Complex,
        Subset::Float,
        Subset::Object,
        Subset::Actual,
        Subset::Long,
    ];

    pub fn from_name(name: &str) -> Option<Subset> {
        Subset::ALL.iter().copied().find(|s| s.name() == name)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Subset::All => "all",
            Subset::Index => "index",
            Subset::Integer => "integer",
            Subset::Rational => "rational",
            Subset::NonBlas => "non_blas",
            Subset::Complex => "complex",
            Subset::Float => "float",
            Subset::Object => "object",
            Subset::Actual => "actual",
            Subset::Long => "long",
        }
    }
}

/// Immutable, validated list of type descriptors.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    has_count_sentinel: bool,
    by_short_id: FxHashMap<String, Dtype>,
    by_sym: FxHashMap<String, Dtype>,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The fifteen-entry NMatrix registry, count sentinel included.
    pub fn nmatrix() -> Self {
        let named = |tag: &str, storage: &str, sym: &str, id: &str, cat, width| {
            TypeDescriptor::new(tag, Storage::named(storage), sym, id, cat, width)
        };
        let types = vec![
            TypeDescriptor::sentinel("NM_NONE", "none"),
            named("NM_BYTE", "u_int8_t", "byte", "b", Category::Integer, 1).unsigned(),
            named("NM_INT8", "int8_t", "int8", "i8", Category::Integer, 1),
            named("NM_INT16", "int16_t", "int16", "i16", Category::Integer, 2),
            named("NM_INT32", "int32_t", "int32", "i32", Category::Integer, 4),
            named("NM_INT64", "int64_t", "int64", "i64", Category::Integer, 8),
            named("NM_FLOAT32", "float", "float32", "f32", Category::Float, 4),
            named("NM_FLOAT64", "double", "float64", "f64", Category::Float, 8),
            named("NM_COMPLEX64", "complex64", "complex64", "c64", Category::Complex, 8),
            named("NM_COMPLEX128", "complex128", "complex128", "c128", Category::Complex, 16),
            named("NM_RATIONAL32", "rational32", "rational32", "r32", Category::Rational, 8),
            named("NM_RATIONAL64", "rational64", "rational64", "r64", Category::Rational, 16),
            named("NM_RATIONAL128", "rational128", "rational128", "r128", Category::Rational, 32),
            named("NM_ROBJ", "VALUE", "object", "v", Category::Object, 8),
            TypeDescriptor::sentinel("NM_TYPES", "dtypes"),
        ];
        Self::assemble(types)
    }

    /// Index validated entries. A trailing sentinel is the count sentinel.
    fn assemble(types: Vec<TypeDescriptor>) -> Self {
        let has_count_sentinel =
            types.len() > 1 && types.last().is_some_and(TypeDescriptor::is_sentinel);
        let mut by_short_id = FxHashMap::default();
        let mut by_sym = FxHashMap::default();
        for (position, desc) in types.iter().enumerate() {
            if desc.is_sentinel() {
                continue;
            }
            let dtype = Dtype::new(position as u8);
            by_short_id.insert(desc.short_id().to_string(), dtype);
            by_sym.entry(desc.sym().to_string()).or_insert(dtype);
        }
        TypeRegistry {
            types,
            has_count_sentinel,
            by_short_id,
            by_sym,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every descriptor in registry order.
    pub fn all(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Handles paired with descriptors, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Dtype, &TypeDescriptor)> + '_ {
        self.types
            .iter()
            .enumerate()
            .map(|(i, desc)| (Dtype::new(i as u8), desc))
    }

    #[inline]
    pub fn get(&self, dtype: Dtype) -> &TypeDescriptor {
        &self.types[dtype.index()]
    }

    /// Handle for a raw position, if in range.
    pub fn dtype(&self, position: usize) -> Option<Dtype> {
        (position < self.types.len()).then(|| Dtype::new(position as u8))
    }

    /// The invalid-type sentinel at position 0.
    #[inline]
    pub fn none(&self) -> Dtype {
        Dtype::new(0)
    }

    pub fn has_count_sentinel(&self) -> bool {
        self.has_count_sentinel
    }

    /// Entries that get a dispatch-table row: the registry minus the count sentinel.
    pub fn dispatch_len(&self) -> usize {
        self.types.len() - usize::from(self.has_count_sentinel)
    }

    pub fn dispatch_types(&self) -> Vec<Dtype> {
        (0..self.dispatch_len())
            .map(|i| Dtype::new(i as u8))
            .collect()
    }

    /// Entries matching `pred`, order preserved.
    pub fn subset(&self, pred: impl Fn(&TypeDescriptor) -> bool) -> Vec<Dtype> {
        self.iter()
            .filter(|(_, desc)| pred(desc))
            .map(|(dtype, _)| dtype)
            .collect()
    }

    pub fn named_subset(&self, subset: Subset) -> Vec<Dtype> {
        match subset {
            Subset::All => self.subset(|_| true),
            Subset::Index => {
                self.subset(|t| t.category() == Category::Integer && t.signed())
            }
            Subset::Integer => self.subset(|t| t.category() == Category::Integer),
            Subset::Rational => self.subset(|t| t.category() == Category::Rational),
            Subset::NonBlas => self.subset(|t| {
                matches!(
                    t.category(),
                    Category::Integer | Category::Rational | Category::Object
                )
            }),
            Subset::Complex => self.subset(|t| t.category() == Category::Complex),
            Subset::Float => self.subset(|t| t.category() == Category::Float),
            Subset::Object => self.subset(|t| t.category() == Category::Object),
            Subset::Actual => self.subset(|t| !t.is_sentinel()),
            Subset::Long => self
                .iter()
                .filter(|(dtype, desc)| {
                    !desc.is_sentinel() && self.widest_of(desc.category()) == Some(*dtype)
                })
                .map(|(dtype, _)| dtype)
                .collect(),
        }
    }

    pub fn by_short_id(&self, id: &str) -> Option<Dtype> {
        self.by_short_id.get(id).copied()
    }

    /// Look a type up by short id, then by display name.
    pub fn lookup(&self, name: &str) -> Option<Dtype> {
        self.by_short_id(name)
            .or_else(|| self.by_sym.get(name).copied())
    }

    /// Resolve an ordered list of subset names and short ids.
    ///
    /// Duplicates are kept: the group is a plain concatenation.
    pub fn resolve_group<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Dtype>, TypeError> {
        let mut group = Vec::new();
        for name in names {
            let name = name.as_ref();
            if let Some(subset) = Subset::from_name(name) {
                group.extend(self.named_subset(subset));
            } else if let Some(dtype) = self.by_short_id(name) {
                group.push(dtype);
            } else {
                return Err(TypeError::UnknownType {
                    name: name.to_string(),
                });
            }
        }
        Ok(group)
    }

    /// The widest entry of `dtype`'s category.
    pub fn widen(&self, dtype: Dtype) -> Result<Dtype, TypeError> {
        let desc = self.get(dtype);
        if desc.is_sentinel() {
            return Err(TypeError::NoWidenedType {
                sym: desc.sym().to_string(),
                category: desc.category(),
            });
        }
        // The category contains `dtype` itself, so a widest entry exists.
        Ok(self.widest_of(desc.category()).unwrap_or(dtype))
    }

    /// The `(category, width)` representative, if the registry has one.
    pub fn find(&self, category: Category, width: u32) -> Option<Dtype> {
        self.iter()
            .find(|(_, desc)| desc.is(category, width))
            .map(|(dtype, _)| dtype)
    }

    fn widest_of(&self, category: Category) -> Option<Dtype> {
        self.iter()
            .filter(|(_, desc)| desc.category() == category)
            .map(|(dtype, _)| dtype)
            .last()
    }
}

/// Validating constructor for [`TypeRegistry`].
#[derive(Default, Debug)]
pub struct RegistryBuilder {
    types: Vec<TypeDescriptor>,
}

impl RegistryBuilder {
    pub fn from_types(types: Vec<TypeDescriptor>) -> Self {
        RegistryBuilder { types }
    }

    #[must_use]
    pub fn push(mut self, desc: TypeDescriptor) -> Self {
        self.types.push(desc);
        self
    }

    pub fn build(self) -> Result<TypeRegistry, TypeError> {
        let types = self.types;
        if types.len() > usize::from(u8::MAX) {
            return Err(TypeError::TooManyTypes { count: types.len() });
        }
        match types.first() {
            Some(first) if first.is_sentinel() => {}
            _ => return Err(TypeError::MissingNoneSentinel),
        }

        let last = types.len() - 1;
        let mut tags: FxHashSet<&str> = FxHashSet::default();
        let mut ids: FxHashSet<&str> = FxHashSet::default();
        for (position, desc) in types.iter().enumerate() {
            if !is_c_identifier(desc.enum_tag()) {
                return Err(TypeError::InvalidEnumTag {
                    tag: desc.enum_tag().to_string(),
                });
            }
            if !tags.insert(desc.enum_tag()) {
                return Err(TypeError::DuplicateEnumTag {
                    tag: desc.enum_tag().to_string(),
                });
            }
            if desc.is_sentinel() {
                if position != 0 && position != last {
                    return Err(TypeError::CountSentinelNotLast {
                        tag: desc.enum_tag().to_string(),
                    });
                }
                continue;
            }
            let id = desc.short_id();
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(TypeError::InvalidShortId {
                    tag: desc.enum_tag().to_string(),
                    id: id.to_string(),
                });
            }
            if !ids.insert(id) {
                return Err(TypeError::DuplicateShortId { id: id.to_string() });
            }
        }

        let registry = TypeRegistry::assemble(types);
        tracing::debug!(
            types = registry.len(),
            count_sentinel = registry.has_count_sentinel,
            "type registry built"
        );
        Ok(registry)
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
