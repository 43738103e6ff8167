//! Registry-keyed C tables.
//!
//! Every table here has one entry per registry position. Dispatch tables
//! stop before the count sentinel; the enum, sizeof, name and upcast tables
//! include it.

use dtgen_types::{Dtype, Mangler, PromotionLattice, TypeRegistry};

use crate::{Emitter, StringEmitter};

/// `head {\n  item,\n  ...\n};\n\n`
pub fn decl(head: &str, items: &[String]) -> String {
    let mut out = StringEmitter::new();
    out.emit_line(&format!("{head} {{"));
    for item in items {
        out.emit_indent(1);
        out.emit_line(&format!("{item},"));
    }
    out.emit_line("};");
    out.emit_newline();
    out.output()
}

fn row(cells: &[String]) -> String {
    format!("{{ {} }}", cells.join(", "))
}

/// `enum <name> { NM_NONE, ... };`
pub fn dtype_enum(registry: &TypeRegistry, enum_name: &str) -> String {
    let tags: Vec<String> = registry
        .all()
        .iter()
        .map(|t| t.enum_tag().to_string())
        .collect();
    decl(&format!("enum {enum_name}"), &tags)
}

pub fn sizeof_table(registry: &TypeRegistry) -> String {
    let sizes: Vec<String> = registry
        .all()
        .iter()
        .map(|t| t.storage().sizeof_expr())
        .collect();
    decl(&format!("const int nm_sizeof[{}] =", registry.len()), &sizes)
}

pub fn name_table(registry: &TypeRegistry) -> String {
    let names: Vec<String> = registry
        .all()
        .iter()
        .map(|t| format!("\"{}\"", t.sym()))
        .collect();
    decl("const char *nm_dtypestring[] =", &names)
}

/// The upcast matrix, one row of enum tags per registry entry.
pub fn upcast_table(registry: &TypeRegistry, lattice: &PromotionLattice) -> String {
    let rows: Vec<String> = registry
        .iter()
        .map(|(a, _)| {
            let tags: Vec<String> = lattice
                .row(a)
                .iter()
                .map(|&r| registry.get(r).enum_tag().to_string())
                .collect();
            row(&tags)
        })
        .collect();
    let n = registry.len();
    decl(&format!("const int8_t Upcast[{n}][{n}] ="), &rows) + "\n"
}

/// Cells of a dispatch table, indexed by enum position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchCells {
    Unary(Vec<String>),
    Binary(Vec<Vec<String>>),
}

/// A named function-pointer table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchTable {
    pub name: String,
    pub c_type: String,
    pub cells: DispatchCells,
    stub: String,
}

impl DispatchTable {
    /// One cell per dispatchable type. Types in `group` get `op` mangled
    /// with themselves; the rest get the error stub.
    pub fn unary(
        name: &str,
        c_type: &str,
        registry: &TypeRegistry,
        mangler: &Mangler,
        op: &str,
        group: &[Dtype],
    ) -> Self {
        let cells = registry
            .dispatch_types()
            .into_iter()
            .map(|t| {
                if group.contains(&t) {
                    mangler.mangle_dtypes(registry, op, &[t])
                } else {
                    mangler.error_stub().to_string()
                }
            })
            .collect();
        Self::new(name, c_type, mangler, DispatchCells::Unary(cells))
    }

    /// A square table over dispatchable types. Cell `[i][j]` is populated
    /// when `i` is in `rows` and `j` in `cols`.
    pub fn binary(
        name: &str,
        c_type: &str,
        registry: &TypeRegistry,
        mangler: &Mangler,
        op: &str,
        rows: &[Dtype],
        cols: &[Dtype],
    ) -> Self {
        Self::binary_with(name, c_type, registry, mangler, |i, j| {
            (rows.contains(&i) && cols.contains(&j))
                .then(|| mangler.mangle_dtypes(registry, op, &[i, j]))
        })
    }

    /// A square table whose populated cells are chosen by `cell`.
    pub fn binary_with(
        name: &str,
        c_type: &str,
        registry: &TypeRegistry,
        mangler: &Mangler,
        cell: impl Fn(Dtype, Dtype) -> Option<String>,
    ) -> Self {
        let types = registry.dispatch_types();
        let cells = types
            .iter()
            .map(|&i| {
                types
                    .iter()
                    .map(|&j| cell(i, j).unwrap_or_else(|| mangler.error_stub().to_string()))
                    .collect()
            })
            .collect();
        Self::new(name, c_type, mangler, DispatchCells::Binary(cells))
    }

    fn new(name: &str, c_type: &str, mangler: &Mangler, cells: DispatchCells) -> Self {
        DispatchTable {
            name: name.to_string(),
            c_type: c_type.to_string(),
            cells,
            stub: mangler.error_stub().to_string(),
        }
    }

    /// Number of cells that are not the error stub.
    pub fn populated(&self) -> usize {
        let live = |cell: &&String| **cell != self.stub;
        match &self.cells {
            DispatchCells::Unary(cells) => cells.iter().filter(live).count(),
            DispatchCells::Binary(rows) => rows.iter().flatten().filter(live).count(),
        }
    }

    /// Every distinct populated symbol, in table order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let cells: Box<dyn Iterator<Item = &String>> = match &self.cells {
            DispatchCells::Unary(cells) => Box::new(cells.iter()),
            DispatchCells::Binary(rows) => Box::new(rows.iter().flatten()),
        };
        for cell in cells {
            if *cell != self.stub && !out.contains(&cell.as_str()) {
                out.push(cell);
            }
        }
        out
    }

    pub fn render(&self) -> String {
        let head = format!("{} {} =", self.c_type, self.name);
        match &self.cells {
            DispatchCells::Unary(cells) => decl(&head, cells),
            DispatchCells::Binary(rows) => {
                let rows: Vec<String> = rows.iter().map(|r| row(r)).collect();
                decl(&head, &rows)
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
