//! Which operators the translator may expand, per category.
//!
//! Blueprints list the operators their templates use. A category with no
//! listing accepts every operator its lowering supports.

use bitflags::bitflags;
use dtgen_types::Category;
use rustc_hash::FxHashMap;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct OpSet: u16 {
        const ADD = 1 << 0;
        const SUB = 1 << 1;
        const MUL = 1 << 2;
        const DIV = 1 << 3;
        const MOD = 1 << 4;
        const EQ = 1 << 5;
        const NE = 1 << 6;
        const LT = 1 << 7;
        const LE = 1 << 8;
        const GT = 1 << 9;
        const GE = 1 << 10;
        /// Unary minus.
        const NEG = 1 << 11;
        const NOT = 1 << 12;

        const ARITHMETIC = Self::ADD.bits() | Self::SUB.bits() | Self::MUL.bits()
            | Self::DIV.bits() | Self::MOD.bits();
        const EQUALITY = Self::EQ.bits() | Self::NE.bits();
        const ORDERING = Self::LT.bits() | Self::LE.bits() | Self::GT.bits() | Self::GE.bits();
    }
}

impl OpSet {
    /// Flags for one operator symbol. `-` covers both subtraction and negation.
    pub fn from_symbol(symbol: &str) -> Option<OpSet> {
        let set = match symbol {
            "+" => OpSet::ADD,
            "-" => OpSet::SUB | OpSet::NEG,
            "*" => OpSet::MUL,
            "/" => OpSet::DIV,
            "%" => OpSet::MOD,
            "==" => OpSet::EQ,
            "!=" => OpSet::NE,
            "<" => OpSet::LT,
            "<=" => OpSet::LE,
            ">" => OpSet::GT,
            ">=" => OpSet::GE,
            "!" => OpSet::NOT,
            _ => return None,
        };
        Some(set)
    }

    /// Union of several symbols. Returns the first unknown symbol on failure.
    pub fn parse<S: AsRef<str>>(symbols: &[S]) -> Result<OpSet, String> {
        symbols.iter().try_fold(OpSet::empty(), |acc, symbol| {
            let symbol = symbol.as_ref();
            OpSet::from_symbol(symbol)
                .map(|set| acc | set)
                .ok_or_else(|| symbol.to_string())
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperatorTable {
    enabled: FxHashMap<Category, OpSet>,
}

impl OperatorTable {
    /// A table that restricts nothing.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Enable `ops` for `category`. The first call makes the category
    /// restricted; later calls widen it.
    pub fn enable(&mut self, category: Category, ops: OpSet) {
        *self.enabled.entry(category).or_insert(OpSet::empty()) |= ops;
    }

    pub fn allows(&self, category: Category, op: OpSet) -> bool {
        self.enabled
            .get(&category)
            .map_or(true, |enabled| enabled.contains(op))
    }

    pub fn is_restricted(&self, category: Category) -> bool {
        self.enabled.contains_key(&category)
    }
}

#[cfg(test)]
mod tests;
