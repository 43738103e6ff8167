//! The promotion ("upcast") lattice.
//!
//! A square table of registry positions answering "what type does `a op b`
//! produce". Only pairs with `a <= b` are computed; each result is mirrored
//! into `[b][a]`, so the table is symmetric by construction.

use crate::{Category, Dtype, TypeRegistry};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromotionLattice {
    side: usize,
    cells: Vec<Dtype>,
}

impl PromotionLattice {
    #[tracing::instrument(level = "debug", skip_all, fields(types = registry.len()))]
    pub fn build(registry: &TypeRegistry) -> Self {
        let side = registry.len();
        let reps = Representatives::new(registry);
        let mut cells = vec![registry.none(); side * side];
        let handles: Vec<Dtype> = registry.iter().map(|(dtype, _)| dtype).collect();
        for (i, &a) in handles.iter().enumerate() {
            for &b in &handles[i..] {
                let result = promote(registry, &reps, a, b);
                cells[a.index() * side + b.index()] = result;
                cells[b.index() * side + a.index()] = result;
            }
        }
        PromotionLattice { side, cells }
    }

    #[inline]
    pub fn result(&self, a: Dtype, b: Dtype) -> Dtype {
        self.cells[a.index() * self.side + b.index()]
    }

    /// Side length, equal to the registry length.
    #[inline]
    pub fn len(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.side == 0
    }

    pub fn row(&self, a: Dtype) -> &[Dtype] {
        let start = a.index() * self.side;
        &self.cells[start..start + self.side]
    }
}

/// The fixed-width types the asymmetric rules name.
struct Representatives {
    f32: Option<Dtype>,
    f64: Option<Dtype>,
    c64: Option<Dtype>,
    c128: Option<Dtype>,
}

impl Representatives {
    fn new(registry: &TypeRegistry) -> Self {
        let widest = |category| {
            registry
                .iter()
                .filter(|(_, desc)| desc.category() == category)
                .map(|(dtype, _)| dtype)
                .last()
        };
        Representatives {
            f32: registry.find(Category::Float, 4),
            f64: registry
                .find(Category::Float, 8)
                .or_else(|| widest(Category::Float)),
            c64: registry.find(Category::Complex, 8),
            c128: registry
                .find(Category::Complex, 16)
                .or_else(|| widest(Category::Complex)),
        }
    }
}

/// `a` is never positioned after `b`.
fn promote(registry: &TypeRegistry, reps: &Representatives, a: Dtype, b: Dtype) -> Dtype {
    let cat_a = registry.get(a).category();
    let cat_b = registry.get(b).category();

    if cat_a == Category::None || cat_b == Category::None {
        return registry.none();
    }
    if cat_a == cat_b || cat_a == Category::Integer || cat_b == Category::Integer {
        return a.max(b);
    }

    let is = |rep: Option<Dtype>, t: Dtype| rep == Some(t);
    match cat_a {
        Category::Float if is(reps.f32, a) => match cat_b {
            Category::Complex | Category::Object => b,
            Category::Rational => reps.f64.unwrap_or(a),
            _ => a,
        },
        Category::Float if is(reps.f64, a) => {
            if is(reps.c128, b) || cat_b == Category::Object {
                b
            } else if is(reps.c64, b) {
                reps.c128.unwrap_or(b)
            } else {
                a
            }
        }
        Category::Float => {
            if cat_b == Category::Object {
                b
            } else {
                a
            }
        }
        Category::Rational => {
            if is(reps.f64, b) || is(reps.c128, b) || cat_b == Category::Object {
                b
            } else if is(reps.f32, b) {
                reps.f64.unwrap_or(b)
            } else if is(reps.c64, b) {
                reps.c128.unwrap_or(b)
            } else {
                a
            }
        }
        Category::Complex => {
            if cat_b == Category::Object {
                b
            } else {
                a
            }
        }
        Category::Object | Category::Integer | Category::None => a,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
